//! Application settings loaded from `config.toml`.
//!
//! Every section is optional; missing values fall back to defaults. The
//! `DATABASE_URL` and `SHAREIT_BIND_ADDRESS` environment variables (usually
//! supplied through `.env`) override the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP listener settings
    pub server: ServerSettings,
    /// Database connection settings
    pub database: DatabaseSettings,
    /// Listing defaults
    pub paging: PagingSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the API binds to, e.g. `127.0.0.1:9090`
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// `SeaORM` connection URL
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: super::database::DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Listing defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
    /// Page size used when a listing request omits `size`
    pub default_size: u64,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self { default_size: 10 }
    }
}

impl Settings {
    /// Applies `DATABASE_URL` and `SHAREIT_BIND_ADDRESS` on top of the file values.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(address) = std::env::var("SHAREIT_BIND_ADDRESS") {
            self.server.bind_address = address;
        }
        self
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A page size of zero is configured
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

fn parse_config(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if settings.paging.default_size == 0 {
        return Err(Error::Config {
            message: "paging.default_size must be greater than zero".to_string(),
        });
    }

    Ok(settings)
}

/// Loads settings from `./config.toml` if present, otherwise defaults, then
/// applies the environment overrides.
pub fn load_default_config() -> Result<Settings> {
    let path = Path::new("config.toml");
    let settings = if path.exists() {
        tracing::debug!("Loading configuration from {:?}", path);
        load_config(path)?
    } else {
        tracing::info!("No config.toml found, using default settings");
        Settings::default()
    };
    Ok(settings.with_env_overrides())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "0.0.0.0:8080"

            [database]
            url = "sqlite::memory:"

            [paging]
            default_size = 25
        "#;

        let settings = parse_config(toml_str).unwrap();
        assert_eq!(settings.server.bind_address, "0.0.0.0:8080");
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert_eq!(settings.paging.default_size, 25);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings = parse_config("[server]\nbind_address = \"127.0.0.1:1\"\n").unwrap();
        assert_eq!(settings.server.bind_address, "127.0.0.1:1");
        assert_eq!(settings.paging.default_size, 10);
        assert_eq!(
            settings.database.url,
            super::super::database::DEFAULT_DATABASE_URL
        );
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = parse_config("[paging]\ndefault_size = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = parse_config("[server\nbind_address = ");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
