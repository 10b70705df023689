//! Payroll aggregation - salary owed versus salary paid, per employee and month.
//!
//! The baseline for a month is the salary recorded on that month's payments, or the
//! employee's current salary when nothing was paid yet. Months before the employee
//! joined are not owed.

use crate::{
    core::{
        employee,
        payment::{self, PartyKind, PaymentStatus},
    },
    entities::{employee as employee_entity, payment as payment_entity},
    errors::Result,
};
use chrono::Datelike;
use sea_orm::DatabaseConnection;
use std::fmt::Write;

/// One month of one employee's payroll.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPayroll {
    /// Month (1-12)
    pub month: i32,
    /// Year
    pub year: i32,
    /// Salary owed
    pub baseline: f64,
    /// Salary paid
    pub paid: f64,
    /// Full, partial or unpaid
    pub status: PaymentStatus,
}

/// A year of payroll for one employee.
#[derive(Debug, Clone)]
pub struct EmployeePayroll {
    /// The employee
    pub employee: employee_entity::Model,
    /// One row per owed month, in calendar order
    pub months: Vec<MonthlyPayroll>,
    /// Sum of baselines
    pub total_baseline: f64,
    /// Sum paid
    pub total_paid: f64,
    /// Owed but not paid (never negative)
    pub outstanding: f64,
    /// Months paid in full
    pub fully_paid_months: usize,
}

/// Aggregates one employee's payments for `year`, months 1 through `through_month`.
#[must_use]
pub fn summarize_payroll(
    employee: &employee_entity::Model,
    payments: &[payment_entity::Model],
    year: i32,
    through_month: u32,
) -> EmployeePayroll {
    let joined = employee.joined_at.date_naive();
    let first_month = match joined.year() {
        y if y > year => 13, // joined after this year: nothing owed
        y if y == year => joined.month(),
        _ => 1,
    };

    let months: Vec<MonthlyPayroll> = (first_month..=through_month.min(12))
        .filter_map(|m| i32::try_from(m).ok())
        .map(|month| {
            let in_month: Vec<&payment_entity::Model> = payments
                .iter()
                .filter(|p| p.party_id == employee.id && p.month == month && p.year == year)
                .collect();
            let baseline = in_month
                .first()
                .map_or(employee.monthly_salary, |p| p.baseline);
            let paid: f64 = in_month.iter().map(|p| p.amount_paid).sum();

            MonthlyPayroll {
                month,
                year,
                baseline,
                paid,
                status: PaymentStatus::from_amounts(baseline, paid),
            }
        })
        .collect();

    let total_baseline: f64 = months.iter().map(|m| m.baseline).sum();
    let total_paid: f64 = months.iter().map(|m| m.paid).sum();
    let fully_paid_months = months
        .iter()
        .filter(|m| m.status == PaymentStatus::Full)
        .count();

    EmployeePayroll {
        employee: employee.clone(),
        months,
        total_baseline,
        total_paid,
        outstanding: (total_baseline - total_paid).max(0.0),
        fully_paid_months,
    }
}

/// Payroll of every active employee for `year`, months 1 through `through_month`.
pub async fn payroll_for_year(
    db: &DatabaseConnection,
    year: i32,
    through_month: u32,
) -> Result<Vec<EmployeePayroll>> {
    let employees = employee::get_all_active_employees(db).await?;
    let mut summaries = Vec::with_capacity(employees.len());

    for emp in &employees {
        let payments = payment::payments_for_party(db, PartyKind::Employee, emp.id).await?;
        summaries.push(summarize_payroll(emp, &payments, year, through_month));
    }

    Ok(summaries)
}

/// Formats payroll summaries as a plain-text table.
pub fn format_payroll_summary(
    summaries: &[EmployeePayroll],
    currency: &str,
) -> Result<String> {
    let mut out = String::new();
    for summary in summaries {
        writeln!(
            out,
            "{} ({}) - paid {currency}{:.2} of {currency}{:.2}, outstanding {currency}{:.2}, {}/{} months in full",
            summary.employee.name,
            summary.employee.role,
            summary.total_paid,
            summary.total_baseline,
            summary.outstanding,
            summary.fully_paid_months,
            summary.months.len()
        )?;
        for month in &summary.months {
            writeln!(
                out,
                "  {:04}-{:02}  {currency}{:.2} / {currency}{:.2}  {}",
                month.year, month.month, month.paid, month.baseline, month.status
            )?;
        }
    }
    Ok(out)
}
