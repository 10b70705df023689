//! Student entity - One enrolled student and their current billing cycle.
//!
//! The cycle bounds are stored as UTC instants; the cycle itself is evaluated at
//! calendar-day granularity. Students are never hard-deleted, `is_active` hides them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name, matched exactly against timetable entries
    pub name: String,
    /// Subject being tutored, matched exactly against timetable entries
    pub subject: String,
    /// Monthly fee charged for one billing cycle
    pub monthly_fee: f64,
    /// `"paid"`, `"partial"` or `"unpaid"` for the current cycle
    pub payment_status: String,
    /// First day of the current billing cycle
    pub cycle_start: DateTimeUtc,
    /// Last day of the current billing cycle (inclusive)
    pub cycle_end: DateTimeUtc,
    /// Contracted tuition hours per cycle, if agreed
    pub contracted_hours: Option<f64>,
    /// Soft delete flag - inactive students are hidden but data is preserved
    pub is_active: bool,
    /// When the student was enrolled
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One student has many weekly schedule slots
    #[sea_orm(has_many = "super::schedule_slot::Entity")]
    ScheduleSlots,
}

impl Related<super::schedule_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
