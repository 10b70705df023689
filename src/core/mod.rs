//! Framework-agnostic business logic.
//!
//! Nothing in here knows about Discord; the bot layer formats what these
//! functions return.

/// Billing cycles and the cycle filter
pub mod cycle;
/// Dashboard metrics
pub mod dashboard;
/// Class duration parsing and aggregation
pub mod duration;
/// Employee records
pub mod employee;
/// Fee and salary payments, cycle roll-over
pub mod payment;
/// Payroll aggregation
pub mod payroll;
/// Cycle reports, text and HTML
pub mod report;
/// Persisted key/value settings
pub mod settings;
/// Student records and weekly slots
pub mod student;
/// Timestamp normalization
pub mod timestamp;
/// Manual and auto-generated classes
pub mod timetable;
