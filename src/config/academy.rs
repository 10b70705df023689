//! Academy configuration loading from config.toml
//!
//! The config file names the academy, sets the default tuition-hour target used
//! when a student has no contracted hours, points at the optional REST backend
//! and lists the subjects offered (used for autocomplete).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "ACADEMY_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Academy identity and offered subjects
    #[serde(default)]
    pub academy: AcademyConfig,
    /// Progress calculation settings
    #[serde(default)]
    pub progress: ProgressConfig,
    /// Remote REST backend settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Academy identity
#[derive(Debug, Deserialize, Clone)]
pub struct AcademyConfig {
    /// Display name used in reports
    pub name: String,
    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Subjects offered, suggested by autocomplete
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            name: "Academy".to_string(),
            currency_symbol: default_currency_symbol(),
            subjects: Vec::new(),
        }
    }
}

/// Progress calculation settings
#[derive(Debug, Deserialize, Clone)]
pub struct ProgressConfig {
    /// Hours per billing cycle for students without contracted hours
    #[serde(default = "default_cycle_hours")]
    pub default_cycle_hours: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            default_cycle_hours: default_cycle_hours(),
        }
    }
}

/// Remote REST backend settings. The bearer token comes from `ACADEMY_API_TOKEN`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RemoteConfig {
    /// Base URL, e.g. `http://localhost:5000`; import is disabled when absent
    pub base_url: Option<String>,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

const fn default_cycle_hours() -> f64 {
    12.0
}

/// Loads the academy configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - `default_cycle_hours` is not a positive number
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    let hours = config.progress.default_cycle_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(Error::Config {
            message: format!("progress.default_cycle_hours must be positive, got {hours}"),
        });
    }

    Ok(config)
}

/// Loads the application configuration.
///
/// Uses the path in `ACADEMY_CONFIG` when set (a missing file is then an error),
/// otherwise `./config.toml`, falling back to defaults when that file is absent.
pub fn load_app_config() -> Result<AppConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config(path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        warn!("No {DEFAULT_CONFIG_PATH} found, using default configuration");
        Ok(AppConfig::default())
    }
}
