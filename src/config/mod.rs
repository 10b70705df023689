/// Academy configuration loading from config.toml
pub mod academy;

/// Database configuration and connection management
pub mod database;

pub use academy::{AppConfig, load_app_config, load_config};
