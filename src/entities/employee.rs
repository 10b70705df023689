//! Employee entity - Tutors and staff on the academy payroll.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Role, e.g. `"Math Tutor"` or `"Receptionist"`
    pub role: String,
    /// Monthly salary baseline
    pub monthly_salary: f64,
    /// Soft delete flag
    pub is_active: bool,
    /// When the employee joined
    pub joined_at: DateTimeUtc,
}

/// Employee has no relationships modelled at the ORM level
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
