//! Payment entity - A fee received from a student or a salary paid to an employee.
//!
//! `party_kind` is `"student"` or `"employee"` and `party_id` points into the
//! matching table. `baseline` is the fee or salary owed for `month`/`year`.
//! Student fees also carry the start of the billing cycle they pay for, since two
//! consecutive cycles can start in the same calendar month.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `"student"` or `"employee"`
    pub party_kind: String,
    /// Id of the student or employee
    pub party_id: i64,
    /// Month the payment is for (1-12)
    pub month: i32,
    /// Year the payment is for
    pub year: i32,
    /// Amount owed for the month
    pub baseline: f64,
    /// Amount actually paid
    pub amount_paid: f64,
    /// When the payment was made
    pub paid_at: DateTimeUtc,
    /// Start of the billing cycle a student fee pays for; `None` for salaries
    pub cycle_start: Option<DateTimeUtc>,
}

/// Payment has no foreign keys; `party_id` is polymorphic
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
