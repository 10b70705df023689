//! Timetable business logic - manual classes, auto-generated classes and lessons.
//!
//! Classes come from two sources: entries scheduled by hand and entries generated
//! from a student's weekly slots. Both are stored in the same table and told
//! apart by `source`; the cycle filter merges them again.

use crate::{
    core::{cycle::BillingCycle, duration, student},
    entities::{TimetableEntry, student as student_entity, timetable_entry},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// Where a timetable entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    /// Scheduled by an admin
    Manual,
    /// Generated from a weekly schedule slot
    Auto,
}

impl EntrySource {
    /// Value stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
        }
    }
}

/// A class to schedule by hand.
#[derive(Debug, Clone)]
pub struct NewClass {
    /// Student attending
    pub student_name: String,
    /// Subject taught
    pub subject: String,
    /// Date and start time
    pub scheduled_at: DateTime<Utc>,
    /// Time range, e.g. `"09:00 AM to 10:00 AM"`
    pub time_range: String,
    /// Topic, may be empty
    pub topic: String,
}

/// A student's classes split by source, each list ordered by time.
#[derive(Debug, Clone, Default)]
pub struct StudentTimetable {
    /// Entries scheduled by hand
    pub manual: Vec<timetable_entry::Model>,
    /// Entries generated from weekly slots
    pub auto: Vec<timetable_entry::Model>,
}

/// Schedules a class by hand.
pub async fn add_manual_entry(
    db: &DatabaseConnection,
    class: NewClass,
) -> Result<timetable_entry::Model> {
    insert_entry(db, class, EntrySource::Manual).await
}

/// Stores an entry after validating names and time range.
pub async fn insert_entry<C>(
    db: &C,
    class: NewClass,
    source: EntrySource,
) -> Result<timetable_entry::Model>
where
    C: ConnectionTrait,
{
    let student_name = class.student_name.trim().to_string();
    let subject = class.subject.trim().to_string();
    if student_name.is_empty() || subject.is_empty() {
        return Err(Error::InvalidInput {
            message: "A class needs a student name and a subject".to_string(),
        });
    }
    if duration::parse_range(&class.time_range).is_none() {
        return Err(Error::InvalidInput {
            message: format!(
                "'{}' is not a range like '09:00 AM to 10:00 AM'",
                class.time_range
            ),
        });
    }

    let entry = timetable_entry::ActiveModel {
        student_name: Set(student_name),
        subject: Set(subject),
        scheduled_at: Set(class.scheduled_at),
        time_range: Set(class.time_range.trim().to_string()),
        topic: Set(class.topic.trim().to_string()),
        source: Set(source.as_str().to_string()),
        completed: Set(false),
        ..Default::default()
    };

    entry.insert(db).await.map_err(Into::into)
}

/// Expands a student's weekly slots into auto entries for every matching day of `cycle`.
///
/// Instants that already have an auto entry are skipped, so running it twice for the
/// same cycle, or having two slots starting at the same time, creates nothing twice.
/// All inserts happen in one transaction. Returns the created entries.
pub async fn generate_auto_entries(
    db: &DatabaseConnection,
    student: &student_entity::Model,
    cycle: &BillingCycle,
) -> Result<Vec<timetable_entry::Model>> {
    let slots = student::get_schedule_slots(db, student.id).await?;

    let txn = db.begin().await?;
    let mut existing: HashSet<DateTime<Utc>> = TimetableEntry::find()
        .filter(timetable_entry::Column::StudentName.eq(student.name.as_str()))
        .filter(timetable_entry::Column::Subject.eq(student.subject.as_str()))
        .filter(timetable_entry::Column::Source.eq(EntrySource::Auto.as_str()))
        .all(&txn)
        .await?
        .into_iter()
        .map(|entry| entry.scheduled_at)
        .collect();

    let mut created = Vec::new();
    for slot in slots {
        let weekday = student::parse_weekday(&slot.weekday)?;
        let Some((start_time, _)) = duration::parse_range(&slot.time_range) else {
            debug!(slot = slot.id, "Skipping slot with unreadable time range");
            continue;
        };

        for day in cycle.days().filter(|day| day.weekday() == weekday) {
            let scheduled_at = day.and_time(start_time).and_utc();
            if !existing.insert(scheduled_at) {
                continue;
            }

            let class = NewClass {
                student_name: student.name.clone(),
                subject: student.subject.clone(),
                scheduled_at,
                time_range: slot.time_range.clone(),
                topic: String::new(),
            };
            created.push(insert_entry(&txn, class, EntrySource::Auto).await?);
        }
    }
    txn.commit().await?;

    created.sort_by_key(|entry| entry.scheduled_at);
    info!(
        student = %student.name,
        count = created.len(),
        "Generated classes from weekly slots"
    );
    Ok(created)
}

/// All classes of a student and subject, split by source.
pub async fn entries_for_student(
    db: &DatabaseConnection,
    student_name: &str,
    subject: &str,
) -> Result<StudentTimetable> {
    let entries = TimetableEntry::find()
        .filter(timetable_entry::Column::StudentName.eq(student_name))
        .filter(timetable_entry::Column::Subject.eq(subject))
        .order_by_asc(timetable_entry::Column::ScheduledAt)
        .all(db)
        .await?;

    let (auto, manual): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| entry.source == EntrySource::Auto.as_str());

    Ok(StudentTimetable { manual, auto })
}

/// Classes of every student between two instants (inclusive), ordered by time.
pub async fn entries_between(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<timetable_entry::Model>> {
    TimetableEntry::find()
        .filter(timetable_entry::Column::ScheduledAt.between(from, to))
        .order_by_asc(timetable_entry::Column::ScheduledAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a class as held, optionally recording the topic covered.
pub async fn mark_completed(
    db: &DatabaseConnection,
    entry_id: i64,
    topic: Option<String>,
) -> Result<timetable_entry::Model> {
    let entry = TimetableEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::InvalidInput {
            message: format!("No class with id {entry_id}"),
        })?;

    let mut active: timetable_entry::ActiveModel = entry.into();
    active.completed = Set(true);
    if let Some(topic) = topic {
        active.topic = Set(topic.trim().to_string());
    }
    active.update(db).await.map_err(Into::into)
}

/// The student's completed lessons, oldest first.
pub async fn completed_lessons(
    db: &DatabaseConnection,
    student_name: &str,
    subject: &str,
) -> Result<Vec<timetable_entry::Model>> {
    TimetableEntry::find()
        .filter(timetable_entry::Column::StudentName.eq(student_name))
        .filter(timetable_entry::Column::Subject.eq(subject))
        .filter(timetable_entry::Column::Completed.eq(true))
        .order_by_asc(timetable_entry::Column::ScheduledAt)
        .all(db)
        .await
        .map_err(Into::into)
}
