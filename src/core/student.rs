//! Student business logic - enrolment, lookups, billing cycles and weekly slots.
//!
//! Students are matched to timetable entries by exact name, so active names are
//! kept unique. Students are never deleted, only deactivated.

use crate::{
    core::{cycle::BillingCycle, duration, payment::PaymentStatus},
    entities::{ScheduleSlot, Student, schedule_slot, student},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc, Weekday};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Everything needed to enrol a student.
#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Full name (trimmed before storing)
    pub name: String,
    /// Subject being tutored
    pub subject: String,
    /// Fee charged per cycle
    pub monthly_fee: f64,
    /// First day of the first billing cycle
    pub cycle_start: NaiveDate,
    /// Last day of the first cycle; one month after the start when absent
    pub cycle_end: Option<NaiveDate>,
    /// Contracted hours per cycle, if agreed
    pub contracted_hours: Option<f64>,
}

/// Retrieves all active students ordered alphabetically by name.
pub async fn get_all_active_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::IsActive.eq(true))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active student by exact name.
pub async fn get_student_by_name<C>(db: &C, name: &str) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find()
        .filter(student::Column::Name.eq(name.trim()))
        .filter(student::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active student by exact name, failing with `StudentNotFound`.
pub async fn require_student_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<student::Model> {
    get_student_by_name(db, name)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            name: name.to_string(),
        })
}

/// Finds a student by id, active or not.
pub async fn get_student_by_id<C>(db: &C, student_id: i64) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Enrols a new student.
///
/// Rejects empty names or subjects, negative or non-finite fees, non-positive
/// contracted hours, a cycle ending before it starts, and names already used by
/// another active student.
pub async fn create_student(db: &DatabaseConnection, new: NewStudent) -> Result<student::Model> {
    let name = new.name.trim().to_string();
    let subject = new.subject.trim().to_string();

    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Student name cannot be empty".to_string(),
        });
    }
    if subject.is_empty() {
        return Err(Error::InvalidInput {
            message: "Subject cannot be empty".to_string(),
        });
    }
    if !new.monthly_fee.is_finite() || new.monthly_fee < 0.0 {
        return Err(Error::InvalidAmount {
            amount: new.monthly_fee,
        });
    }
    if let Some(hours) = new.contracted_hours {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(Error::InvalidAmount { amount: hours });
        }
    }

    let cycle = match new.cycle_end {
        Some(end) => BillingCycle::new(new.cycle_start, end)?,
        None => BillingCycle::monthly_from(new.cycle_start),
    };

    if get_student_by_name(db, &name).await?.is_some() {
        return Err(Error::InvalidInput {
            message: format!("An active student named '{name}' already exists"),
        });
    }

    let model = student::ActiveModel {
        name: Set(name),
        subject: Set(subject),
        monthly_fee: Set(new.monthly_fee),
        payment_status: Set(PaymentStatus::Unpaid.as_str().to_string()),
        cycle_start: Set(cycle.start_instant()),
        cycle_end: Set(cycle.end_instant()),
        contracted_hours: Set(new.contracted_hours),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(student = %created.name, "Enrolled student");
    Ok(created)
}

/// Soft-deletes a student. Their classes and payments are kept.
pub async fn deactivate_student(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    let student = get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            name: student_id.to_string(),
        })?;

    let mut active: student::ActiveModel = student.into();
    active.is_active = Set(false);
    let updated = active.update(db).await?;
    info!(student = %updated.name, "Deactivated student");
    Ok(updated)
}

/// Replaces a student's current billing cycle.
pub async fn update_cycle<C>(db: &C, student_id: i64, cycle: BillingCycle) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let student = get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            name: student_id.to_string(),
        })?;

    let mut active: student::ActiveModel = student.into();
    active.cycle_start = Set(cycle.start_instant());
    active.cycle_end = Set(cycle.end_instant());
    active.update(db).await.map_err(Into::into)
}

/// Stores the payment status for the student's current cycle.
pub async fn update_payment_status<C>(
    db: &C,
    student_id: i64,
    status: PaymentStatus,
) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let student = get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            name: student_id.to_string(),
        })?;

    let mut active: student::ActiveModel = student.into();
    active.payment_status = Set(status.as_str().to_string());
    active.update(db).await.map_err(Into::into)
}

/// Adds a weekly class slot, e.g. Mondays `"04:00 PM to 05:00 PM"`.
pub async fn add_schedule_slot(
    db: &DatabaseConnection,
    student_id: i64,
    weekday: Weekday,
    time_range: &str,
) -> Result<schedule_slot::Model> {
    if duration::parse_range(time_range).is_none() {
        return Err(Error::InvalidInput {
            message: format!("'{time_range}' is not a range like '04:00 PM to 05:00 PM'"),
        });
    }

    if get_student_by_id(db, student_id).await?.is_none() {
        return Err(Error::StudentNotFound {
            name: student_id.to_string(),
        });
    }

    let slot = schedule_slot::ActiveModel {
        student_id: Set(student_id),
        weekday: Set(weekday.to_string()),
        time_range: Set(time_range.trim().to_string()),
        ..Default::default()
    };

    slot.insert(db).await.map_err(Into::into)
}

/// Retrieves a student's weekly slots.
pub async fn get_schedule_slots(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<schedule_slot::Model>> {
    ScheduleSlot::find()
        .filter(schedule_slot::Column::StudentId.eq(student_id))
        .order_by_asc(schedule_slot::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Parses a weekday name such as `"Mon"` or `"monday"`.
pub fn parse_weekday(text: &str) -> Result<Weekday> {
    text.trim().parse::<Weekday>().map_err(|_| Error::InvalidInput {
        message: format!("'{text}' is not a weekday"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_student_defaults_to_monthly_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_student(
            &db,
            NewStudent {
                name: "  Ayesha Khan ".to_string(),
                subject: "Mathematics".to_string(),
                monthly_fee: 120.0,
                cycle_start: date(2025, 1, 1),
                cycle_end: None,
                contracted_hours: None,
            },
        )
        .await?;

        assert_eq!(student.name, "Ayesha Khan");
        assert_eq!(student.payment_status, "unpaid");
        assert!(student.is_active);
        let cycle = BillingCycle::for_student(&student)?;
        assert_eq!(cycle.start(), date(2025, 1, 1));
        assert_eq!(cycle.end(), date(2025, 2, 1));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_validates_input() -> Result<()> {
        let db = setup_test_db().await?;
        let base = NewStudent {
            name: "Bilal".to_string(),
            subject: "Physics".to_string(),
            monthly_fee: 100.0,
            cycle_start: date(2025, 1, 1),
            cycle_end: None,
            contracted_hours: None,
        };

        let empty_name = NewStudent {
            name: "   ".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            create_student(&db, empty_name).await,
            Err(Error::InvalidInput { .. })
        ));

        let negative_fee = NewStudent {
            monthly_fee: -5.0,
            ..base.clone()
        };
        assert!(matches!(
            create_student(&db, negative_fee).await,
            Err(Error::InvalidAmount { .. })
        ));

        let backwards = NewStudent {
            cycle_end: Some(date(2024, 12, 1)),
            ..base.clone()
        };
        assert!(matches!(
            create_student(&db, backwards).await,
            Err(Error::InvalidCycle { .. })
        ));

        let zero_hours = NewStudent {
            contracted_hours: Some(0.0),
            ..base
        };
        assert!(matches!(
            create_student(&db, zero_hours).await,
            Err(Error::InvalidAmount { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_active_name_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_student(&db, "Ayesha Khan").await?;
        let result = create_test_student(&db, "Ayesha Khan").await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivated_student_is_hidden_but_kept() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Ayesha Khan").await?;
        create_test_student(&db, "Bilal Ahmed").await?;

        deactivate_student(&db, student.id).await?;

        assert!(get_student_by_name(&db, "Ayesha Khan").await?.is_none());
        let kept = get_student_by_id(&db, student.id).await?.unwrap();
        assert!(!kept.is_active);

        let active = get_all_active_students(&db).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Bilal Ahmed");

        // The name is free again once the old record is inactive
        create_test_student(&db, "Ayesha Khan").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_require_student_by_name_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_student_by_name(&db, "Nobody").await;
        assert!(matches!(result, Err(Error::StudentNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_cycle_and_status() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Ayesha Khan").await?;

        let cycle = BillingCycle::new(date(2025, 3, 1), date(2025, 3, 31))?;
        let updated = update_cycle(&db, student.id, cycle).await?;
        assert_eq!(BillingCycle::for_student(&updated)?, cycle);

        let updated = update_payment_status(&db, student.id, PaymentStatus::Partial).await?;
        assert_eq!(updated.payment_status, "partial");
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_slots() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Ayesha Khan").await?;

        add_schedule_slot(&db, student.id, Weekday::Mon, "04:00 PM to 05:00 PM").await?;
        add_schedule_slot(&db, student.id, parse_weekday("thursday")?, "06:00 PM to 07:30 PM")
            .await?;

        let slots = get_schedule_slots(&db, student.id).await?;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].weekday, "Mon");
        assert_eq!(slots[1].weekday, "Thu");

        let bad = add_schedule_slot(&db, student.id, Weekday::Tue, "after school").await;
        assert!(matches!(bad, Err(Error::InvalidInput { .. })));

        let missing = add_schedule_slot(&db, 999, Weekday::Tue, "04:00 PM to 05:00 PM").await;
        assert!(matches!(missing, Err(Error::StudentNotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday(" friday ").unwrap(), Weekday::Fri);
        assert!(parse_weekday("someday").is_err());
    }
}
