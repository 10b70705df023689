//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Class scheduling commands
pub mod class;

/// Dashboard command
pub mod dashboard;

/// General utility commands
pub mod general;

/// Remote import command
pub mod import;

/// Fee, salary and payroll commands
pub mod payment;

/// Cycle report and HTML export commands
pub mod report;

/// Student management commands
pub mod student;

// Export commands
pub use class::*;
pub use dashboard::*;
pub use general::*;
pub use import::*;
pub use payment::*;
pub use report::*;
pub use student::*;
