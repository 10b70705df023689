//! Student Discord commands - `student add/list/info/deactivate/slot`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            cycle::BillingCycle,
            report,
            student::{self, NewStudent},
            timestamp,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for managing students.
    #[poise::command(
        slash_command,
        rename = "student",
        subcommands(
            "student_add",
            "student_list",
            "student_info",
            "student_deactivate",
            "student_slot"
        )
    )]
    pub async fn student_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Student management command. Available subcommands:\n\
            `/student add` - Enrol a student\n\
            `/student list` - List active students\n\
            `/student info` - Show a student's cycle and slots\n\
            `/student deactivate` - Deactivate a student\n\
            `/student slot` - Add a weekly class slot";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Enrols a new student starting unpaid.
    #[poise::command(slash_command, rename = "add")]
    pub async fn student_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Subject"]
        #[autocomplete = "autocomplete::autocomplete_subject"]
        subject: String,
        #[description = "Monthly fee"] monthly_fee: f64,
        #[description = "First day of the first cycle (YYYY-MM-DD)"] start_date: String,
        #[description = "Last day of the first cycle (YYYY-MM-DD), one month by default"]
        end_date: Option<String>,
        #[description = "Contracted hours per cycle"] contracted_hours: Option<f64>,
    ) -> Result<()> {
        let Some(cycle_start) = timestamp::parse_iso(&start_date).map(|d| d.date_naive()) else {
            ctx.say(format!("❌ '{start_date}' is not a date like 2025-01-31."))
                .await?;
            return Ok(());
        };
        let cycle_end = match end_date.as_deref().map(timestamp::parse_iso) {
            None => None,
            Some(Some(end)) => Some(end.date_naive()),
            Some(None) => {
                ctx.say("❌ The end date is not a date like 2025-01-31.")
                    .await?;
                return Ok(());
            }
        };

        let db = &ctx.data().database;
        let created = student::create_student(
            db,
            NewStudent {
                name,
                subject,
                monthly_fee,
                cycle_start,
                cycle_end,
                contracted_hours,
            },
        )
        .await?;
        let cycle = BillingCycle::for_student(&created)?;

        ctx.say(format!(
            "✅ Enrolled **{}** for {} ({} per cycle). First cycle: {} to {}.",
            created.name,
            created.subject,
            report::format_currency(created.monthly_fee, &ctx.data().config.academy.currency_symbol),
            cycle.start(),
            cycle.end()
        ))
        .await?;
        Ok(())
    }

    /// Lists all active students with their payment status.
    #[poise::command(slash_command, rename = "list")]
    pub async fn student_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().config.academy.currency_symbol;

        let students = student::get_all_active_students(db).await?;
        if students.is_empty() {
            ctx.say("🎓 No students yet. Enrol one with `/student add`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("🎓 **Active Students**\n\n");
        for s in &students {
            let cycle = BillingCycle::for_student(s)?;
            writeln!(
                &mut response,
                "• **{}** - {} | {} | {} | cycle {} to {}",
                s.name,
                s.subject,
                report::format_currency(s.monthly_fee, currency),
                s.payment_status,
                cycle.start(),
                cycle.end()
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows a student's cycle, payment status and weekly slots.
    #[poise::command(slash_command, rename = "info")]
    pub async fn student_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let s = student::require_student_by_name(db, &name).await?;
        let cycle = BillingCycle::for_student(&s)?;
        let slots = student::get_schedule_slots(db, s.id).await?;

        let mut response = format!("🎓 **{}** ({})\n\n", s.name, s.subject);
        writeln!(
            &mut response,
            "💰 Fee: {} | Status: {}",
            report::format_currency(s.monthly_fee, &ctx.data().config.academy.currency_symbol),
            s.payment_status
        )?;
        writeln!(&mut response, "📅 Cycle: {} to {}", cycle.start(), cycle.end())?;
        if let Some(hours) = s.contracted_hours {
            writeln!(&mut response, "⏱️ Contracted: {}", report::format_hours(hours))?;
        }

        if slots.is_empty() {
            response.push_str("\n_No weekly slots_\n");
        } else {
            response.push_str("\n**Weekly slots:**\n");
            for slot in slots {
                writeln!(&mut response, "• {} {}", slot.weekday, slot.time_range)?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Deactivates a student. Classes and payments are kept.
    #[poise::command(slash_command, rename = "deactivate")]
    pub async fn student_deactivate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let s = student::require_student_by_name(db, &name).await?;
        let s = student::deactivate_student(db, s.id).await?;

        ctx.say(format!("✅ Deactivated **{}**.", s.name)).await?;
        Ok(())
    }

    /// Adds a weekly class slot for a student.
    #[poise::command(slash_command, rename = "slot")]
    pub async fn student_slot(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
        #[description = "Weekday (e.g. Mon)"] day: String,
        #[description = "Time range (e.g. 04:00 PM to 05:00 PM)"] time: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let s = student::require_student_by_name(db, &name).await?;
        let weekday = student::parse_weekday(&day)?;
        let slot = student::add_schedule_slot(db, s.id, weekday, &time).await?;

        ctx.say(format!(
            "✅ **{}** now has a class every {} at {}.",
            s.name, slot.weekday, slot.time_range
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
