//! Schedule slot entity - A recurring weekly class slot for a student.
//!
//! Slots are expanded into auto-generated timetable entries for a billing cycle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule slot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_slots")]
pub struct Model {
    /// Unique identifier for the slot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student this slot belongs to
    pub student_id: i64,
    /// Three-letter weekday, `"Mon"` through `"Sun"`
    pub weekday: String,
    /// Time range in 12-hour notation, e.g. `"04:00 PM to 05:00 PM"`
    pub time_range: String,
}

/// Defines relationships between `ScheduleSlot` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each slot belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
