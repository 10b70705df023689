//! Timetable entry entity - One class occurrence, scheduled by hand or generated.
//!
//! Entries reference the student by name and subject rather than by id, the same
//! way the imported timetable documents do. `source` is `"manual"` or `"auto"`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Timetable entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the student attending
    pub student_name: String,
    /// Subject taught in this class
    pub subject: String,
    /// Date and start time of the class
    pub scheduled_at: DateTimeUtc,
    /// Time range in 12-hour notation, e.g. `"09:00 AM to 10:00 AM"`
    pub time_range: String,
    /// Topic covered (may be empty)
    pub topic: String,
    /// `"manual"` or `"auto"`
    pub source: String,
    /// Whether the lesson was held
    pub completed: bool,
}

/// `TimetableEntry` has no foreign keys; it is matched to students by name
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
