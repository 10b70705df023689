//! Billing cycles and the cycle filter.
//!
//! A billing cycle is the inclusive calendar-day range between a student's last
//! payment and the next due date. The cycle filter merges the manually scheduled
//! and the auto-generated class lists and keeps the classes of one student and
//! subject that fall inside the cycle, in chronological order.

use crate::{
    core::timestamp::AsInstant,
    entities::{student, timetable_entry},
    errors::{Error, Result},
};
use chrono::{DateTime, Months, NaiveDate, TimeDelta, Utc};
use tracing::warn;

/// An inclusive range of calendar days. `end` is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingCycle {
    start: NaiveDate,
    end: NaiveDate,
}

impl BillingCycle {
    /// Creates a cycle, rejecting one that ends before it starts.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidCycle { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a cycle from two instants, keeping only their UTC calendar days.
    pub fn from_instants(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::new(start.date_naive(), end.date_naive())
    }

    /// The current cycle of a student.
    pub fn for_student(student: &student::Model) -> Result<Self> {
        Self::from_instants(student.cycle_start, student.cycle_end)
    }

    /// The monthly cycle starting on `start`.
    #[must_use]
    pub fn monthly_from(start: NaiveDate) -> Self {
        let end = start
            .checked_add_months(Months::new(1))
            .unwrap_or_else(|| start + TimeDelta::days(30));
        Self { start, end }
    }

    /// First day of the cycle
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the cycle (inclusive)
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Midnight UTC of the first day
    #[must_use]
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Midnight UTC of the last day
    #[must_use]
    pub fn end_instant(&self) -> DateTime<Utc> {
        self.end.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Whether `day` lies within the cycle, bounds included.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// A cycle is ongoing while `now` is before its last day.
    #[must_use]
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        now < self.end_instant()
    }

    /// The following monthly cycle, starting on this cycle's last day.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::monthly_from(self.end)
    }

    /// Every day of the cycle, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }
}

/// A class occurrence that can be matched against a student's cycle.
pub trait ClassRecord {
    /// Name of the student attending
    fn student_name(&self) -> &str;
    /// Subject taught
    fn subject(&self) -> &str;
    /// Time range in 12-hour notation, e.g. `"09:00 AM to 10:00 AM"`
    fn time_range(&self) -> &str;
    /// When the class took place; `None` if the record's date is unusable
    fn scheduled_at(&self) -> Option<DateTime<Utc>>;
}

impl ClassRecord for timetable_entry::Model {
    fn student_name(&self) -> &str {
        &self.student_name
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn time_range(&self) -> &str {
        &self.time_range
    }

    fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at.as_instant()
    }
}

/// One class selected by the cycle filter.
#[derive(Debug, Clone, Copy)]
pub struct CycleEntry<'a, T> {
    /// Normalized timestamp of the class
    pub at: DateTime<Utc>,
    /// The underlying record
    pub record: &'a T,
}

/// Result of running the cycle filter.
#[derive(Debug, Clone)]
pub struct CycleSelection<'a, T> {
    /// Matching classes inside the cycle, sorted ascending by timestamp
    pub entries: Vec<CycleEntry<'a, T>>,
    /// Classes of this student and subject dropped because their date was unusable
    pub excluded_undated: usize,
}

impl<T> CycleSelection<'_, T> {
    /// Number of selected classes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no class was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selects a student's classes that fall inside their current billing cycle.
///
/// Convenience wrapper around [`select_entries_in_cycle`] using the student's
/// name, subject and stored cycle bounds.
pub fn select_cycle_entries<'a, T: ClassRecord>(
    student: &student::Model,
    manual: &'a [T],
    auto: &'a [T],
) -> Result<CycleSelection<'a, T>> {
    let cycle = BillingCycle::for_student(student)?;
    Ok(select_entries_in_cycle(
        &student.name,
        &student.subject,
        &cycle,
        manual,
        auto,
    ))
}

/// The cycle filter.
///
/// Concatenates `manual` and `auto`, keeps records whose student name and subject
/// match exactly, drops records without a usable date, keeps those whose calendar
/// day lies within `cycle` and sorts them by full timestamp. Records appearing in
/// both lists are kept twice.
pub fn select_entries_in_cycle<'a, T: ClassRecord>(
    student_name: &str,
    subject: &str,
    cycle: &BillingCycle,
    manual: &'a [T],
    auto: &'a [T],
) -> CycleSelection<'a, T> {
    let mut excluded_undated = 0;
    let mut entries: Vec<CycleEntry<'a, T>> = manual
        .iter()
        .chain(auto.iter())
        .filter(|record| record.student_name() == student_name && record.subject() == subject)
        .filter_map(|record| {
            let Some(at) = record.scheduled_at() else {
                excluded_undated += 1;
                return None;
            };
            Some(CycleEntry { at, record })
        })
        .filter(|entry| cycle.contains(entry.at.date_naive()))
        .collect();

    // Stable sort keeps concatenation order for equal timestamps
    entries.sort_by_key(|entry| entry.at);

    if excluded_undated > 0 {
        warn!(
            student = student_name,
            subject, excluded_undated, "Classes without a usable date were left out of the cycle"
        );
    }

    CycleSelection {
        entries,
        excluded_undated,
    }
}
