//! Unified error type for the academy portal.
//!
//! Every layer (core logic, persistence, remote import and the bot) returns
//! [`Result`], so errors propagate with `?` all the way up to the command
//! handler, which reports them back to the admin.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced anywhere in the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// No active student with the given name or id
    #[error("Student not found: {name}")]
    StudentNotFound {
        /// Name (or id) that was looked up
        name: String,
    },

    /// No active employee with the given name or id
    #[error("Employee not found: {name}")]
    EmployeeNotFound {
        /// Name (or id) that was looked up
        name: String,
    },

    /// A monetary amount or hour count was negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A billing cycle ended before it started
    #[error("Invalid billing cycle: end {end} is before start {start}")]
    InvalidCycle {
        /// First day of the rejected cycle
        start: NaiveDate,
        /// Last day of the rejected cycle
        end: NaiveDate,
    },

    /// Any other rejected user input (weekday, time range, month, ...)
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description of the problem
        message: String,
    },

    /// The remote backend answered with something unusable
    #[error("Remote backend error: {message}")]
    Remote {
        /// Human-readable description of the problem
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP error talking to the remote backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting into a `String` failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Integer conversion overflowed
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
