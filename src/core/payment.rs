//! Payment business logic - student fees, employee salaries and cycle roll-over.
//!
//! A salary payment is stored against the month it pays for, a fee payment against
//! the billing cycle it pays for. Whether a month or cycle is fully paid is a plain
//! comparison between what has been paid so far and the baseline (salary or fee).

use crate::{
    core::{cycle::BillingCycle, employee, student},
    entities::{Payment, Student, payment, student as student_entity},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::fmt;
use tracing::{info, instrument};

/// Payment state of a student's cycle or an employee's month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// The full baseline has been paid
    Full,
    /// Something, but less than the baseline, has been paid
    Partial,
    /// Nothing has been paid
    Unpaid,
}

impl PaymentStatus {
    /// Derives the status from the amount owed and the amount paid.
    ///
    /// Paying at least the baseline counts as full.
    #[must_use]
    pub fn from_amounts(baseline: f64, paid: f64) -> Self {
        if paid > 0.0 && paid >= baseline {
            Self::Full
        } else if paid > 0.0 {
            Self::Partial
        } else if baseline <= 0.0 {
            // Nothing owed, nothing paid
            Self::Full
        } else {
            Self::Unpaid
        }
    }

    /// Value stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "paid",
            Self::Partial => "partial",
            Self::Unpaid => "unpaid",
        }
    }

    /// Parses a stored or imported status. Unknown text yields `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "paid" | "full" | "fully paid" => Some(Self::Full),
            "partial" | "partially paid" => Some(Self::Partial),
            "unpaid" | "pending" | "due" | "overdue" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Full => "Paid",
            Self::Partial => "Partial",
            Self::Unpaid => "Unpaid",
        };
        f.write_str(label)
    }
}

/// Who a payment concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyKind {
    /// Fee paid by a student
    Student,
    /// Salary paid to an employee
    Employee,
}

impl PartyKind {
    /// Value stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Employee => "employee",
        }
    }
}

/// Result of recording a student fee payment.
#[derive(Debug, Clone)]
pub struct StudentPaymentOutcome {
    /// The stored payment
    pub payment: payment::Model,
    /// Total paid towards the cycle so far, this payment included
    pub paid_in_cycle: f64,
    /// Status of the cycle after this payment
    pub status: PaymentStatus,
    /// The student after the status update
    pub student: student_entity::Model,
}

/// Records a fee payment towards the student's current cycle.
///
/// The payment is booked on the cycle (and, for reporting, on the month the cycle
/// starts in). The student's status is recomputed from everything paid towards
/// that cycle. Runs in one transaction.
#[instrument(skip(db))]
pub async fn record_student_payment(
    db: &DatabaseConnection,
    student_id: i64,
    amount: f64,
    paid_at: DateTime<Utc>,
) -> Result<StudentPaymentOutcome> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let student = student::get_student_by_id(&txn, student_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| Error::StudentNotFound {
            name: student_id.to_string(),
        })?;

    let cycle = BillingCycle::for_student(&student)?;
    let month = month_of(cycle.start());
    let year = cycle.start().year();

    let payment = payment::ActiveModel {
        party_kind: Set(PartyKind::Student.as_str().to_string()),
        party_id: Set(student_id),
        month: Set(month),
        year: Set(year),
        baseline: Set(student.monthly_fee),
        amount_paid: Set(amount),
        paid_at: Set(paid_at),
        cycle_start: Set(Some(cycle.start_instant())),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let paid_in_cycle = total_paid_for_cycle(&txn, student_id, &cycle).await?;
    let status = PaymentStatus::from_amounts(student.monthly_fee, paid_in_cycle);
    let student = student::update_payment_status(&txn, student_id, status).await?;

    txn.commit().await?;

    info!(student = %student.name, amount, %status, "Recorded fee payment");

    Ok(StudentPaymentOutcome {
        payment,
        paid_in_cycle,
        status,
        student,
    })
}

/// Records a salary payment to an employee for the given month.
#[instrument(skip(db))]
pub async fn record_salary_payment(
    db: &DatabaseConnection,
    employee_id: i64,
    month: i32,
    year: i32,
    amount: f64,
    paid_at: DateTime<Utc>,
) -> Result<payment::Model> {
    validate_amount(amount)?;
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidInput {
            message: format!("Month must be between 1 and 12, got {month}"),
        });
    }

    let employee = employee::get_employee_by_id(db, employee_id)
        .await?
        .filter(|e| e.is_active)
        .ok_or_else(|| Error::EmployeeNotFound {
            name: employee_id.to_string(),
        })?;

    let payment = payment::ActiveModel {
        party_kind: Set(PartyKind::Employee.as_str().to_string()),
        party_id: Set(employee_id),
        month: Set(month),
        year: Set(year),
        baseline: Set(employee.monthly_salary),
        amount_paid: Set(amount),
        paid_at: Set(paid_at),
        cycle_start: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(employee = %employee.name, month, year, amount, "Recorded salary payment");
    Ok(payment)
}

/// All payments concerning one student or employee, oldest first.
pub async fn payments_for_party(
    db: &DatabaseConnection,
    kind: PartyKind,
    party_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::PartyKind.eq(kind.as_str()))
        .filter(payment::Column::PartyId.eq(party_id))
        .order_by_asc(payment::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Payments of one kind booked on a given month.
pub async fn payments_for_month(
    db: &DatabaseConnection,
    kind: PartyKind,
    month: i32,
    year: i32,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::PartyKind.eq(kind.as_str()))
        .filter(payment::Column::Month.eq(month))
        .filter(payment::Column::Year.eq(year))
        .order_by_asc(payment::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum paid by or to one party for one month.
pub async fn total_paid_for_month<C>(
    db: &C,
    kind: PartyKind,
    party_id: i64,
    month: i32,
    year: i32,
) -> Result<f64>
where
    C: ConnectionTrait,
{
    let payments = Payment::find()
        .filter(payment::Column::PartyKind.eq(kind.as_str()))
        .filter(payment::Column::PartyId.eq(party_id))
        .filter(payment::Column::Month.eq(month))
        .filter(payment::Column::Year.eq(year))
        .all(db)
        .await?;

    Ok(payments.iter().map(|p| p.amount_paid).sum())
}

/// Fee payments a student made towards one billing cycle, oldest first.
pub async fn payments_for_cycle<C>(
    db: &C,
    student_id: i64,
    cycle: &BillingCycle,
) -> Result<Vec<payment::Model>>
where
    C: ConnectionTrait,
{
    Payment::find()
        .filter(payment::Column::PartyKind.eq(PartyKind::Student.as_str()))
        .filter(payment::Column::PartyId.eq(student_id))
        .filter(payment::Column::CycleStart.eq(cycle.start_instant()))
        .order_by_asc(payment::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum a student paid towards one billing cycle.
pub async fn total_paid_for_cycle<C>(db: &C, student_id: i64, cycle: &BillingCycle) -> Result<f64>
where
    C: ConnectionTrait,
{
    let payments = payments_for_cycle(db, student_id, cycle).await?;
    Ok(payments.iter().map(|p| p.amount_paid).sum())
}

/// A student whose cycle was moved forward.
#[derive(Debug, Clone)]
pub struct CycleAdvance {
    /// Student name
    pub student_name: String,
    /// The cycle that ended
    pub previous: BillingCycle,
    /// The cycle that starts now
    pub current: BillingCycle,
    /// Status the previous cycle ended with
    pub previous_status: String,
}

/// Moves every active student whose cycle has ended into the next cycle.
///
/// The new cycle starts on the old cycle's last day and lasts one month; its status
/// starts as unpaid. All updates happen in one transaction.
#[instrument(skip(db))]
pub async fn advance_due_cycles(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<CycleAdvance>> {
    let txn = db.begin().await?;

    let students = Student::find()
        .filter(student_entity::Column::IsActive.eq(true))
        .order_by_asc(student_entity::Column::Name)
        .all(&txn)
        .await?;

    let mut advanced = Vec::new();
    for s in students {
        let mut previous = BillingCycle::for_student(&s)?;
        if previous.is_ongoing(now) {
            continue;
        }

        // A student left alone for months catches up one cycle at a time
        let mut current = previous.next();
        while !current.is_ongoing(now) {
            previous = current;
            current = current.next();
        }

        let previous_status = s.payment_status.clone();
        let mut active: student_entity::ActiveModel = s.clone().into();
        active.cycle_start = Set(current.start_instant());
        active.cycle_end = Set(current.end_instant());
        active.payment_status = Set(PaymentStatus::Unpaid.as_str().to_string());
        active.update(&txn).await?;

        advanced.push(CycleAdvance {
            student_name: s.name,
            previous,
            current,
            previous_status,
        });
    }

    txn.commit().await?;
    info!(count = advanced.len(), "Advanced billing cycles");
    Ok(advanced)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn month_of(date: NaiveDate) -> i32 {
    // month() is 1..=12
    #[allow(clippy::cast_possible_wrap)]
    let month = date.month() as i32;
    month
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_status_from_amounts() {
        assert_eq!(PaymentStatus::from_amounts(100.0, 100.0), PaymentStatus::Full);
        assert_eq!(PaymentStatus::from_amounts(100.0, 150.0), PaymentStatus::Full);
        assert_eq!(PaymentStatus::from_amounts(100.0, 40.0), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::from_amounts(100.0, 0.0), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::from_amounts(0.0, 0.0), PaymentStatus::Full);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(PaymentStatus::parse("Paid"), Some(PaymentStatus::Full));
        assert_eq!(PaymentStatus::parse(" partial "), Some(PaymentStatus::Partial));
        assert_eq!(PaymentStatus::parse("Pending"), Some(PaymentStatus::Unpaid));
        assert_eq!(PaymentStatus::parse("maybe"), None);
        for status in [PaymentStatus::Full, PaymentStatus::Partial, PaymentStatus::Unpaid] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[tokio::test]
    async fn test_partial_then_full_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Ayesha Khan").await?;

        let first = record_student_payment(&db, student.id, 40.0, instant(2025, 1, 3)).await?;
        assert_eq!(first.status, PaymentStatus::Partial);
        assert_eq!(first.student.payment_status, "partial");
        assert_eq!(first.payment.month, 1);
        assert_eq!(first.payment.year, 2025);
        assert_eq!(first.payment.baseline, 100.0);

        let second = record_student_payment(&db, student.id, 60.0, instant(2025, 1, 10)).await?;
        assert_eq!(second.paid_in_cycle, 100.0);
        assert_eq!(second.status, PaymentStatus::Full);
        assert_eq!(second.student.payment_status, "paid");

        let history = payments_for_party(&db, PartyKind::Student, student.id).await?;
        assert_eq!(history.len(), 2);
        assert!(history[0].paid_at <= history[1].paid_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_rejects_bad_amounts_and_unknown_student() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Ayesha Khan").await?;

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = record_student_payment(&db, student.id, amount, instant(2025, 1, 3)).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        let missing = record_student_payment(&db, 999, 10.0, instant(2025, 1, 3)).await;
        assert!(matches!(missing, Err(Error::StudentNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_salary_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "Sana Malik").await?;

        let payment =
            record_salary_payment(&db, employee.id, 2, 2025, 900.0, instant(2025, 2, 28)).await?;
        assert_eq!(payment.party_kind, "employee");
        assert_eq!(payment.cycle_start, None);
        assert_eq!(payment.baseline, 1000.0);

        let bad_month =
            record_salary_payment(&db, employee.id, 13, 2025, 900.0, instant(2025, 2, 28)).await;
        assert!(matches!(bad_month, Err(Error::InvalidInput { .. })));

        let total = total_paid_for_month(&db, PartyKind::Employee, employee.id, 2, 2025).await?;
        assert_eq!(total, 900.0);

        let february = payments_for_month(&db, PartyKind::Employee, 2, 2025).await?;
        assert_eq!(february.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_due_cycles() -> Result<()> {
        let db = setup_test_db().await?;
        // Test students get the cycle 2025-01-01..2025-01-31
        let student = create_test_student(&db, "Ayesha Khan").await?;
        record_student_payment(&db, student.id, 100.0, instant(2025, 1, 2)).await?;

        // Still inside January: nothing moves
        let none = advance_due_cycles(&db, instant(2025, 1, 20)).await?;
        assert!(none.is_empty());

        let advanced = advance_due_cycles(&db, instant(2025, 2, 5)).await?;
        assert_eq!(advanced.len(), 1);
        assert_eq!(advanced[0].previous_status, "paid");
        assert_eq!(advanced[0].current.start(), date(2025, 1, 31));
        assert_eq!(advanced[0].current.end(), date(2025, 2, 28));

        let reloaded = student::get_student_by_id(&db, student.id).await?.unwrap();
        assert_eq!(reloaded.payment_status, "unpaid");
        assert_eq!(BillingCycle::for_student(&reloaded)?, advanced[0].current);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_after_advance_counts_towards_new_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Ayesha Khan").await?;
        record_student_payment(&db, student.id, 100.0, instant(2025, 1, 2)).await?;

        // New cycle 2025-01-31..2025-02-28 starts in January too
        let advanced = advance_due_cycles(&db, instant(2025, 2, 5)).await?;
        let current = advanced[0].current;
        assert_eq!(total_paid_for_cycle(&db, student.id, &current).await?, 0.0);

        let outcome = record_student_payment(&db, student.id, 10.0, instant(2025, 2, 6)).await?;
        assert_eq!(outcome.paid_in_cycle, 10.0);
        assert_eq!(outcome.status, PaymentStatus::Partial);
        assert_eq!(outcome.student.payment_status, "partial");
        assert_eq!(outcome.payment.cycle_start, Some(current.start_instant()));

        let january = BillingCycle::new(date(2025, 1, 1), date(2025, 1, 31))?;
        assert_eq!(total_paid_for_cycle(&db, student.id, &january).await?, 100.0);
        assert_eq!(payments_for_cycle(&db, student.id, &current).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_catches_up_several_cycles() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_student(&db, "Ayesha Khan").await?;

        let advanced = advance_due_cycles(&db, instant(2025, 4, 10)).await?;
        assert_eq!(advanced.len(), 1);
        assert!(advanced[0].current.is_ongoing(instant(2025, 4, 10)));
        assert!(advanced[0].current.contains(date(2025, 4, 10)));
        Ok(())
    }
}
