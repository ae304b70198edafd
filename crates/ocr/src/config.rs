use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::policy::AcceptancePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Scanner configuration, usually loaded from a TOML file:
///
/// ```toml
/// [acceptance]
/// require_amount = true
/// valid_from = "2024-01-01"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub acceptance: AcceptancePolicy,
}

impl ScanConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = ScanConfig::from_toml("").unwrap();
        assert_eq!(cfg, ScanConfig::default());
        assert!(cfg.acceptance.require_amount);
        assert_eq!(cfg.acceptance.valid_from, None);
    }

    #[test]
    fn parses_acceptance_section() {
        let cfg = ScanConfig::from_toml(
            r#"
            [acceptance]
            require_amount = false
            valid_from = "2024-01-01"
            "#,
        )
        .unwrap();
        assert!(!cfg.acceptance.require_amount);
        assert_eq!(cfg.acceptance.valid_from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = ScanConfig::from_toml("[acceptance]\nvalid_from = \"2025-03-01\"\n").unwrap();
        assert!(cfg.acceptance.require_amount);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            ScanConfig::from_toml("[acceptance\nrequire_amount = "),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ScanConfig::from_toml("[acceptance]\nvalid_from = \"not a date\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expensa.toml");
        std::fs::write(&path, "[acceptance]\nrequire_amount = false\n").unwrap();
        assert!(!ScanConfig::load(&path).unwrap().acceptance.require_amount);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScanConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
