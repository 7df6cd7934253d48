//! Runtime configuration for a ledger process.
//!
//! # Responsibility
//! - Collect database location, logging options and id display policy.
//! - Normalize and validate them before anything is opened.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingError};
use crate::model::ids::{StripPrefix, DEFAULT_PROPERTY_ID_PREFIX};
use std::path::PathBuf;

/// Default ledger database file name, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "title_ledger.sqlite3";

/// Ledger process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    /// Prefix stripped from property ids in ownership views.
    pub property_id_prefix: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            property_id_prefix: DEFAULT_PROPERTY_ID_PREFIX.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Returns a copy with a normalized log level and a checked log dir.
    pub fn validate(&self) -> Result<Self, LoggingError> {
        let log_level = normalize_level(&self.log_level)?.to_string();
        let log_dir = self
            .log_dir
            .as_deref()
            .map(normalize_log_dir)
            .transpose()?;

        Ok(Self {
            db_path: self.db_path.clone(),
            log_level,
            log_dir,
            property_id_prefix: self.property_id_prefix.clone(),
        })
    }

    pub fn id_display_policy(&self) -> StripPrefix {
        StripPrefix::new(self.property_id_prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{LedgerConfig, DEFAULT_DB_FILE_NAME};
    use crate::model::ids::IdDisplayPolicy;
    use std::path::PathBuf;

    #[test]
    fn defaults_point_at_local_db_without_file_logging() {
        let config = LedgerConfig::default();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
        assert_eq!(
            config.id_display_policy().display_property_id("property_4"),
            "4"
        );
    }

    #[test]
    fn validate_normalizes_level_and_rejects_relative_log_dir() {
        let config = LedgerConfig {
            log_level: " WARNING ".to_string(),
            ..LedgerConfig::default()
        };
        assert_eq!(config.validate().unwrap().log_level, "warn");

        let relative = LedgerConfig {
            log_dir: Some(PathBuf::from("logs")),
            ..LedgerConfig::default()
        };
        assert!(relative.validate().is_err());
    }
}
