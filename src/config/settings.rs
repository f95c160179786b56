//! Application configuration loading from config.toml
//!
//! The file lists the sellers and yearly goals used to seed an empty
//! database, the rate of the default commission rule, and the directory
//! that report exports are written to. Every section is optional.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_commission_rate() -> f64 {
    5.0
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Sellers to seed
    #[serde(default)]
    pub sellers: Vec<SellerConfig>,
    /// Annual goals to seed
    #[serde(default)]
    pub goals: Vec<GoalConfig>,
    /// Rate of the default commission rule created on first run
    #[serde(default = "default_commission_rate")]
    pub default_commission_rate: f64,
    /// Where report sheets are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sellers: Vec::new(),
            goals: Vec::new(),
            default_commission_rate: default_commission_rate(),
            export_dir: default_export_dir(),
        }
    }
}

/// A seller entry
#[derive(Debug, Deserialize, Clone)]
pub struct SellerConfig {
    /// Seller name, also the seeding key
    pub name: String,
    /// Email address
    pub email: String,
    /// Monthly quota
    #[serde(default)]
    pub monthly_quota: f64,
    /// Annual quota
    #[serde(default)]
    pub annual_quota: f64,
}

/// A yearly company goal
#[derive(Debug, Deserialize, Clone)]
pub struct GoalConfig {
    /// Calendar year
    pub year: i32,
    /// Target revenue
    pub target: f64,
    /// Free-text description
    pub description: Option<String>,
}

/// Loads the configuration from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration from ./config.toml
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            default_commission_rate = 6.5
            export_dir = "out"

            [[sellers]]
            name = "Ariane"
            email = "ariane@example.com"
            monthly_quota = 50000.0
            annual_quota = 600000.0

            [[sellers]]
            name = "Marcos"
            email = "marcos@example.com"

            [[goals]]
            year = 2025
            target = 3000000.0
            description = "Team trip"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sellers.len(), 2);
        assert_eq!(config.sellers[0].annual_quota, 600_000.0);
        assert_eq!(config.sellers[1].monthly_quota, 0.0);
        assert_eq!(config.goals[0].year, 2025);
        assert_eq!(config.goals[0].description.as_deref(), Some("Team trip"));
        assert_eq!(config.default_commission_rate, 6.5);
        assert_eq!(config.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.sellers.is_empty());
        assert!(config.goals.is_empty());
        assert_eq!(config.default_commission_rate, 5.0);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[goals]]\nyear = 2026\ntarget = 100.0").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.goals.len(), 1);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("/definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
