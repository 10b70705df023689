//! Remote backend import.
//!
//! The academy's older REST backend serves students, employees and timetable
//! entries as loosely-typed JSON documents. [`documents`] is the only place that
//! knows their field names; everything past it works on typed records.

/// HTTP client for the REST backend
pub mod client;
/// External document shapes and their normalization into typed drafts
pub mod documents;
/// Upserting normalized documents into the database
pub mod import;

pub use client::ApiClient;
pub use import::{ImportReport, RemoteSource, import_all};
