//! Settings loading from catalog.toml
//!
//! Every key is optional. Values from the environment (`DATABASE_URL`, `RUST_LOG`)
//! win over values from the file, and built-in defaults fill whatever is left.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "catalog.toml";

/// Raw contents of catalog.toml
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Connection string for the catalog database
    pub database_url: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: Option<String>,
}

/// Resolved application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Connection string for the catalog database
    pub database_url: String,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Settings {
    /// Merges file values with the environment, environment first.
    fn resolve(file: SettingsFile, env: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: env("DATABASE_URL")
                .or(file.database_url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            log_filter: env("RUST_LOG")
                .or(file.log_filter)
                .unwrap_or_else(|| "info".to_string()),
        }
    }
}

/// Parses settings from a TOML string
///
/// # Errors
/// Returns `Error::Config` if the TOML is invalid or contains unknown keys.
pub fn parse_settings(contents: &str) -> Result<SettingsFile> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })
}

/// Loads settings from `path`, treating a missing file as empty.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let file = if path.exists() {
        debug!("Loading settings from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read settings file {path:?}: {e}"),
        })?;
        parse_settings(&contents)?
    } else {
        debug!("No settings file at {:?}, using defaults", path);
        SettingsFile::default()
    };

    Ok(Settings::resolve(file, |key| std::env::var(key).ok()))
}

/// Loads settings from the default location (./catalog.toml)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_PATH)
}
