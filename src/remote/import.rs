//! Import of students, employees and classes from the REST backend.
//!
//! All three collections are fetched before anything is written; a failed fetch
//! aborts the import with the database untouched. Writes happen in a single
//! transaction. Students and employees are matched by exact name, preferring the
//! active row over deactivated namesakes, so running the import twice updates
//! rather than duplicates.

use super::documents::{
    EmployeeDocument, EmployeeDraft, StudentDocument, StudentDraft, TimetableDocument,
    normalize_employee, normalize_student,
};
use crate::{
    core::{
        settings::{LAST_IMPORT_KEY, set_setting},
        timestamp::normalize_value,
        timetable::EntrySource,
    },
    entities::{
        Employee, ScheduleSlot, Student, TimetableEntry, employee, schedule_slot, student,
        timetable_entry,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Anything that can serve the three backend collections.
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    /// All student documents
    async fn fetch_students(&self) -> Result<Vec<StudentDocument>>;
    /// All employee documents
    async fn fetch_employees(&self) -> Result<Vec<EmployeeDocument>>;
    /// All timetable documents
    async fn fetch_timetable(&self) -> Result<Vec<TimetableDocument>>;
}

/// What an import changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Students that did not exist yet
    pub students_created: usize,
    /// Students matched by name and overwritten
    pub students_updated: usize,
    /// Employees that did not exist yet
    pub employees_created: usize,
    /// Employees matched by name and overwritten
    pub employees_updated: usize,
    /// Classes inserted
    pub classes_imported: usize,
    /// Documents rejected by normalization or missing a student name
    pub skipped_documents: usize,
    /// Timetable documents without a usable date
    pub classes_undated: usize,
}

impl ImportReport {
    /// One-line summary for the admin
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Students: {} new, {} updated. Employees: {} new, {} updated. \
             Classes: {} imported, {} without a date. Skipped documents: {}.",
            self.students_created,
            self.students_updated,
            self.employees_created,
            self.employees_updated,
            self.classes_imported,
            self.classes_undated,
            self.skipped_documents,
        )
    }
}

/// Fetches everything from `source` and writes it to the database.
#[instrument(skip_all)]
pub async fn import_all<S: RemoteSource>(
    db: &DatabaseConnection,
    source: &S,
    now: DateTime<Utc>,
) -> Result<ImportReport> {
    let student_docs = source.fetch_students().await?;
    let employee_docs = source.fetch_employees().await?;
    let timetable_docs = source.fetch_timetable().await?;

    let mut report = ImportReport::default();
    let txn = db.begin().await?;

    for doc in &student_docs {
        match normalize_student(doc) {
            Ok(draft) => {
                if upsert_student(&txn, draft, now).await? {
                    report.students_created += 1;
                } else {
                    report.students_updated += 1;
                }
            }
            Err(e) => {
                warn!(name = ?doc.name, error = %e, "Skipping student document");
                report.skipped_documents += 1;
            }
        }
    }

    for doc in &employee_docs {
        match normalize_employee(doc) {
            Ok(draft) => {
                if upsert_employee(&txn, draft, now).await? {
                    report.employees_created += 1;
                } else {
                    report.employees_updated += 1;
                }
            }
            Err(e) => {
                warn!(name = ?doc.name, error = %e, "Skipping employee document");
                report.skipped_documents += 1;
            }
        }
    }

    let (imported, undated, nameless) = import_classes(&txn, &timetable_docs).await?;
    report.classes_imported = imported;
    report.classes_undated = undated;
    report.skipped_documents += nameless;

    set_setting(&txn, LAST_IMPORT_KEY, &now.to_rfc3339()).await?;
    txn.commit().await?;

    info!(?report, "Remote import finished");
    Ok(report)
}

/// Returns `true` when the student was created, `false` when updated.
async fn upsert_student(
    txn: &DatabaseTransaction,
    draft: StudentDraft,
    now: DateTime<Utc>,
) -> Result<bool> {
    let existing = match Student::find()
        .filter(student::Column::Name.eq(draft.name.as_str()))
        .filter(student::Column::IsActive.eq(true))
        .one(txn)
        .await?
    {
        Some(model) => Some(model),
        None => {
            Student::find()
                .filter(student::Column::Name.eq(draft.name.as_str()))
                .order_by_desc(student::Column::Id)
                .one(txn)
                .await?
        }
    };
    let created = existing.is_none();

    let mut active: student::ActiveModel = match existing {
        Some(model) => model.into(),
        None => student::ActiveModel {
            created_at: Set(now),
            ..Default::default()
        },
    };
    active.name = Set(draft.name);
    active.subject = Set(draft.subject);
    active.monthly_fee = Set(draft.monthly_fee);
    active.payment_status = Set(draft.payment_status.as_str().to_string());
    active.cycle_start = Set(draft.cycle.start_instant());
    active.cycle_end = Set(draft.cycle.end_instant());
    active.contracted_hours = Set(draft.contracted_hours);
    active.is_active = Set(draft.is_active);
    let saved = if created {
        active.insert(txn).await?
    } else {
        active.update(txn).await?
    };
    let student_id = saved.id;

    // The backend owns the weekly schedule, replace it wholesale
    ScheduleSlot::delete_many()
        .filter(schedule_slot::Column::StudentId.eq(student_id))
        .exec(txn)
        .await?;
    for (weekday, time_range) in draft.slots {
        schedule_slot::ActiveModel {
            student_id: Set(student_id),
            weekday: Set(weekday.to_string()),
            time_range: Set(time_range),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }

    Ok(created)
}

/// Returns `true` when the employee was created, `false` when updated.
async fn upsert_employee(
    txn: &DatabaseTransaction,
    draft: EmployeeDraft,
    now: DateTime<Utc>,
) -> Result<bool> {
    let existing = match Employee::find()
        .filter(employee::Column::Name.eq(draft.name.as_str()))
        .filter(employee::Column::IsActive.eq(true))
        .one(txn)
        .await?
    {
        Some(model) => Some(model),
        None => {
            Employee::find()
                .filter(employee::Column::Name.eq(draft.name.as_str()))
                .order_by_desc(employee::Column::Id)
                .one(txn)
                .await?
        }
    };
    let created = existing.is_none();

    let mut active: employee::ActiveModel = match existing {
        Some(model) => model.into(),
        None => employee::ActiveModel {
            joined_at: Set(draft.joined_at.unwrap_or(now)),
            ..Default::default()
        },
    };
    active.name = Set(draft.name);
    active.role = Set(draft.role);
    active.monthly_salary = Set(draft.monthly_salary);
    active.is_active = Set(draft.is_active);
    if let Some(joined_at) = draft.joined_at {
        active.joined_at = Set(joined_at);
    }
    if created {
        active.insert(txn).await?;
    } else {
        active.update(txn).await?;
    }

    Ok(created)
}

/// Inserts dated classes not already stored.
///
/// Returns `(imported, undated, nameless)`.
async fn import_classes(
    txn: &DatabaseTransaction,
    docs: &[TimetableDocument],
) -> Result<(usize, usize, usize)> {
    let mut seen: HashSet<(String, String, DateTime<Utc>)> = TimetableEntry::find()
        .all(txn)
        .await?
        .into_iter()
        .map(|entry| (entry.student_name, entry.subject, entry.scheduled_at))
        .collect();

    let mut imported = 0;
    let mut undated = 0;
    let mut nameless = 0;
    for doc in docs {
        let Some(scheduled_at) = normalize_value(&doc.date) else {
            undated += 1;
            continue;
        };
        let student_name = doc.student_name.trim().to_string();
        let subject = doc.subject.trim().to_string();
        if student_name.is_empty() {
            nameless += 1;
            continue;
        }
        if !seen.insert((student_name.clone(), subject.clone(), scheduled_at)) {
            continue;
        }

        let source = if doc.auto_generated {
            EntrySource::Auto
        } else {
            EntrySource::Manual
        };
        timetable_entry::ActiveModel {
            student_name: Set(student_name),
            subject: Set(subject),
            scheduled_at: Set(scheduled_at),
            time_range: Set(doc.time.as_deref().map(str::trim).unwrap_or_default().to_string()),
            topic: Set(doc.topic.as_deref().map(str::trim).unwrap_or_default().to_string()),
            source: Set(source.as_str().to_string()),
            completed: Set(false),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        imported += 1;
    }

    if undated > 0 {
        warn!(undated, "Timetable documents without a usable date were not imported");
    }
    if nameless > 0 {
        warn!(nameless, "Timetable documents without a student name were skipped");
    }
    Ok((imported, undated, nameless))
}
