//! Dashboard metrics for the admin overview.

use crate::{
    core::{
        cycle::BillingCycle,
        employee,
        payment::{self, PartyKind, PaymentStatus},
        student, timetable,
    },
    entities::{Payment, payment as payment_entity},
    errors::Result,
};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use sea_orm::{DatabaseConnection, prelude::*};
use std::fmt::Write;

/// Headline numbers for the academy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardMetrics {
    /// Students currently enrolled
    pub active_students: usize,
    /// Employees currently on payroll
    pub active_employees: usize,
    /// Sum of the monthly fees of active students
    pub expected_fees: f64,
    /// Fees received during the current calendar month
    pub fees_collected_this_month: f64,
    /// Fees still owed for the students' current cycles
    pub outstanding_fees: f64,
    /// Students whose current cycle is paid in full
    pub students_paid: usize,
    /// Students who paid part of their current cycle
    pub students_partial: usize,
    /// Students who paid nothing for their current cycle
    pub students_unpaid: usize,
    /// Classes scheduled in the current week (Monday to Sunday)
    pub classes_this_week: usize,
    /// Of those, classes already marked as held
    pub completed_classes_this_week: usize,
    /// Salaries paid during the current calendar month
    pub salaries_paid_this_month: f64,
}

/// Computes the dashboard as of `now`.
pub async fn compute_dashboard(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<DashboardMetrics> {
    let students = student::get_all_active_students(db).await?;
    let employees = employee::get_all_active_employees(db).await?;

    let mut metrics = DashboardMetrics {
        active_students: students.len(),
        active_employees: employees.len(),
        expected_fees: students.iter().map(|s| s.monthly_fee).sum(),
        ..Default::default()
    };

    for s in &students {
        let cycle = BillingCycle::for_student(s)?;
        let paid = payment::total_paid_for_cycle(db, s.id, &cycle).await?;
        metrics.outstanding_fees += (s.monthly_fee - paid).max(0.0);

        match PaymentStatus::from_amounts(s.monthly_fee, paid) {
            PaymentStatus::Full => metrics.students_paid += 1,
            PaymentStatus::Partial => metrics.students_partial += 1,
            PaymentStatus::Unpaid => metrics.students_unpaid += 1,
        }
    }

    let (month_start, next_month_start) = month_bounds(now);
    let this_month: Vec<payment_entity::Model> = Payment::find()
        .filter(payment_entity::Column::PaidAt.gte(month_start))
        .filter(payment_entity::Column::PaidAt.lt(next_month_start))
        .all(db)
        .await?;
    metrics.fees_collected_this_month = sum_for(&this_month, PartyKind::Student);
    metrics.salaries_paid_this_month = sum_for(&this_month, PartyKind::Employee);

    let (week_start, week_end) = week_bounds(now);
    let week = timetable::entries_between(db, week_start, week_end).await?;
    metrics.classes_this_week = week.len();
    metrics.completed_classes_this_week = week.iter().filter(|e| e.completed).count();

    Ok(metrics)
}

/// Monday 00:00 through Sunday 23:59:59 of the week containing `now`.
#[must_use]
pub fn week_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let monday = today - TimeDelta::days(i64::from(today.weekday().num_days_from_monday()));
    let start = monday.and_time(NaiveTime::MIN).and_utc();
    let end = start + TimeDelta::days(7) - TimeDelta::seconds(1);
    (start, end)
}

/// Midnight of the first day of `now`'s month and of the following month.
#[must_use]
pub fn month_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let first = today - TimeDelta::days(i64::from(today.day0()));
    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    (
        first.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    )
}

fn sum_for(payments: &[payment_entity::Model], kind: PartyKind) -> f64 {
    payments
        .iter()
        .filter(|p| p.party_kind == kind.as_str())
        .map(|p| p.amount_paid)
        .sum()
}

/// Formats the dashboard as plain text.
pub fn format_dashboard(metrics: &DashboardMetrics, currency: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "Students: {} active ({} paid, {} partial, {} unpaid)",
        metrics.active_students,
        metrics.students_paid,
        metrics.students_partial,
        metrics.students_unpaid
    )?;
    writeln!(out, "Employees: {} active", metrics.active_employees)?;
    writeln!(
        out,
        "Fees: {currency}{:.2} collected this month, {currency}{:.2} expected, {currency}{:.2} outstanding",
        metrics.fees_collected_this_month, metrics.expected_fees, metrics.outstanding_fees
    )?;
    writeln!(
        out,
        "Salaries paid this month: {currency}{:.2}",
        metrics.salaries_paid_this_month
    )?;
    write!(
        out,
        "Classes this week: {} ({} held)",
        metrics.classes_this_week, metrics.completed_classes_this_week
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_week_bounds() {
        // 2025-01-15 is a Wednesday
        let (start, end) = week_bounds(instant(2025, 1, 15));
        assert_eq!(start, instant(2025, 1, 13));
        assert_eq!(end, instant(2025, 1, 20) - TimeDelta::seconds(1));

        // Monday maps onto itself
        let (start, _) = week_bounds(instant(2025, 1, 13));
        assert_eq!(start, instant(2025, 1, 13));
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(instant(2025, 1, 15) + TimeDelta::hours(13));
        assert_eq!(start, instant(2025, 1, 1));
        assert_eq!(end, instant(2025, 2, 1));

        let (start, end) = month_bounds(instant(2024, 12, 31));
        assert_eq!(start, instant(2024, 12, 1));
        assert_eq!(end, instant(2025, 1, 1));
    }

    #[tokio::test]
    async fn test_collected_this_month_excludes_other_months() -> Result<()> {
        let db = setup_test_db().await?;
        let ayesha = create_test_student(&db, "Ayesha Khan").await?;
        payment::record_student_payment(&db, ayesha.id, 100.0, instant(2025, 1, 2)).await?;
        payment::advance_due_cycles(&db, instant(2025, 2, 5)).await?;
        payment::record_student_payment(&db, ayesha.id, 10.0, instant(2025, 2, 6)).await?;

        let metrics = compute_dashboard(&db, instant(2025, 2, 10)).await?;
        assert_eq!(metrics.fees_collected_this_month, 10.0);
        // Only the new cycle's payment counts towards what is owed now
        assert_eq!(metrics.outstanding_fees, 90.0);
        assert_eq!(metrics.students_partial, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_dashboard() -> Result<()> {
        let db = setup_test_db().await?;
        let metrics = compute_dashboard(&db, instant(2025, 1, 15)).await?;
        assert_eq!(metrics, DashboardMetrics::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_metrics() -> Result<()> {
        let db = setup_test_db().await?;
        let ayesha = create_test_student(&db, "Ayesha Khan").await?;
        let bilal = create_test_student(&db, "Bilal Ahmed").await?;
        create_test_student(&db, "Chen Wei").await?;
        let sana = create_test_employee(&db, "Sana Malik").await?;

        payment::record_student_payment(&db, ayesha.id, 100.0, instant(2025, 1, 3)).await?;
        payment::record_student_payment(&db, bilal.id, 30.0, instant(2025, 1, 4)).await?;
        payment::record_salary_payment(&db, sana.id, 1, 2025, 1000.0, instant(2025, 1, 5))
            .await?;

        let held = timetable::add_manual_entry(&db, new_class("Ayesha Khan", instant(2025, 1, 14)))
            .await?;
        timetable::mark_completed(&db, held.id, None).await?;
        timetable::add_manual_entry(&db, new_class("Bilal Ahmed", instant(2025, 1, 16))).await?;
        timetable::add_manual_entry(&db, new_class("Bilal Ahmed", instant(2025, 1, 25))).await?;

        let metrics = compute_dashboard(&db, instant(2025, 1, 15)).await?;
        assert_eq!(metrics.active_students, 3);
        assert_eq!(metrics.active_employees, 1);
        assert_eq!(metrics.expected_fees, 300.0);
        assert_eq!(metrics.fees_collected_this_month, 130.0);
        assert_eq!(metrics.outstanding_fees, 170.0);
        assert_eq!(metrics.students_paid, 1);
        assert_eq!(metrics.students_partial, 1);
        assert_eq!(metrics.students_unpaid, 1);
        assert_eq!(metrics.salaries_paid_this_month, 1000.0);
        assert_eq!(metrics.classes_this_week, 2);
        assert_eq!(metrics.completed_classes_this_week, 1);

        let text = format_dashboard(&metrics, "$")?;
        assert!(text.contains("3 active (1 paid, 1 partial, 1 unpaid)"));
        assert!(text.contains("$130.00 collected"));
        Ok(())
    }
}
