//! Money Discord commands - `pay`, `salary`, `payroll` and `advance`.
//!
//! Fee and salary payments go through `core::payment`, which keeps each
//! student's status in step with what has been paid for the cycle.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{employee, payment, payroll, report, student},
        errors::{Error, Result},
    };
    use chrono::{Datelike, Utc};
    use std::fmt::Write;

    /// Records a fee payment towards a student's current cycle.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
        #[description = "Amount paid"] amount: f64,
    ) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            ctx.say("❌ Invalid amount: must be greater than zero")
                .await?;
            return Ok(());
        }

        let db = &ctx.data().database;
        let currency = &ctx.data().config.academy.currency_symbol;
        let s = student::require_student_by_name(db, &name).await?;
        let outcome = payment::record_student_payment(db, s.id, amount, Utc::now()).await?;

        ctx.say(format!(
            "✅ Recorded {} from **{}**. Paid this cycle: {} of {} ({}).",
            report::format_currency(amount, currency),
            outcome.student.name,
            report::format_currency(outcome.paid_in_cycle, currency),
            report::format_currency(outcome.student.monthly_fee, currency),
            outcome.status
        ))
        .await?;
        Ok(())
    }

    /// Records a salary payment to an employee.
    ///
    /// Month and year default to the current month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn salary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee name"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: String,
        #[description = "Amount paid"] amount: f64,
        #[description = "Month paid for (1-12), defaults to this month"] month: Option<u32>,
        #[description = "Year paid for, defaults to this year"] year: Option<i32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().config.academy.currency_symbol;
        let now = Utc::now();
        let month = i32::try_from(month.unwrap_or_else(|| now.month()))?;
        let year = year.unwrap_or_else(|| now.year());

        let Some(emp) = employee::get_employee_by_name(db, &name).await? else {
            return Err(Error::EmployeeNotFound { name });
        };
        let recorded =
            payment::record_salary_payment(db, emp.id, month, year, amount, now).await?;
        let paid =
            payment::total_paid_for_month(db, payment::PartyKind::Employee, emp.id, month, year)
                .await?;
        let status = payment::PaymentStatus::from_amounts(recorded.baseline, paid);

        ctx.say(format!(
            "✅ Paid {} to **{}** for {month:02}/{year}. Total for the month: {} of {} ({status}).",
            report::format_currency(amount, currency),
            emp.name,
            report::format_currency(paid, currency),
            report::format_currency(recorded.baseline, currency),
        ))
        .await?;
        Ok(())
    }

    /// Shows the salary summary of every active employee for a year.
    #[poise::command(slash_command, prefix_command)]
    pub async fn payroll(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year, defaults to this year"] year: Option<i32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let now = Utc::now();
        let year = year.unwrap_or_else(|| now.year());
        // A past year is summarized in full
        let through_month = if year < now.year() { 12 } else { now.month() };

        let summaries = payroll::payroll_for_year(db, year, through_month).await?;
        if summaries.is_empty() {
            ctx.say("👥 No active employees.").await?;
            return Ok(());
        }

        let summary =
            payroll::format_payroll_summary(&summaries, &ctx.data().config.academy.currency_symbol)?;
        ctx.say(format!("👥 **Payroll {year}**\n```\n{summary}\n```"))
            .await?;
        Ok(())
    }

    /// Moves every student whose cycle has ended into the next cycle.
    #[poise::command(slash_command, prefix_command)]
    pub async fn advance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        ctx.defer().await?;

        let advanced = payment::advance_due_cycles(db, Utc::now()).await?;
        if advanced.is_empty() {
            ctx.say("ℹ️ Every cycle is still running. Nothing to advance.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("✅ **Cycles advanced**\n\n");
        for change in &advanced {
            writeln!(
                &mut response,
                "• **{}**: {} to {} ended {}, now {} to {}",
                change.student_name,
                change.previous.start(),
                change.previous.end(),
                change.previous_status,
                change.current.start(),
                change.current.end()
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
