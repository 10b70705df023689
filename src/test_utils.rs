//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        employee,
        student::{self, NewStudent},
        timetable::NewClass,
    },
    entities,
    errors::Result,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Midnight UTC of a calendar date.
pub fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Creates a test student with sensible defaults.
///
/// # Defaults
/// * `subject`: "Mathematics"
/// * `monthly_fee`: 100.0
/// * cycle: 2025-01-01 to 2025-01-31
/// * `contracted_hours`: None
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::student::Model> {
    create_custom_student(db, name, None).await
}

/// Creates a test student with contracted hours.
pub async fn create_custom_student(
    db: &DatabaseConnection,
    name: &str,
    contracted_hours: Option<f64>,
) -> Result<entities::student::Model> {
    student::create_student(
        db,
        NewStudent {
            name: name.to_string(),
            subject: "Mathematics".to_string(),
            monthly_fee: 100.0,
            cycle_start: date(2025, 1, 1),
            cycle_end: Some(date(2025, 1, 31)),
            contracted_hours,
        },
    )
    .await
}

/// Creates a test employee.
///
/// # Defaults
/// * `role`: "Mathematics Tutor"
/// * `monthly_salary`: 1000.0
/// * `joined_at`: 2024-09-01
pub async fn create_test_employee(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, name, "Mathematics Tutor", 1000.0, instant(2024, 9, 1)).await
}

/// A one-hour Mathematics class for `student_name` at 09:00 on the day of `day`.
pub fn new_class(student_name: &str, day: DateTime<Utc>) -> NewClass {
    NewClass {
        student_name: student_name.to_string(),
        subject: "Mathematics".to_string(),
        scheduled_at: day + chrono::TimeDelta::hours(9),
        time_range: "09:00 AM to 10:00 AM".to_string(),
        topic: String::new(),
    }
}
