//! Serializable pipeline configuration.
//!
//! The CLI layer owns where this comes from (a TOML file, flags, or both);
//! the pipeline itself only ever sees a fully-resolved `PipelineConfig`.

use crate::store::WriteMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for a single pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory of source trade CSV files.
    pub input_dir: PathBuf,
    /// Delete source files after reading them. Destructive; off by default.
    pub delete_inputs: bool,
    pub database: DatabaseConfig,
    /// Root directory for the report buckets.
    pub output_dir: PathBuf,
    /// Remove the output directory before writing.
    pub clear_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite database file, created if missing.
    pub path: PathBuf,
    pub table: String,
    pub mode: WriteMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("common_directory"),
            delete_inputs: false,
            database: DatabaseConfig::default(),
            output_dir: PathBuf::from("output"),
            clear_output: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("database.db"),
            table: "trades".to_string(),
            mode: WriteMode::Replace,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file. Missing keys take their defaults;
    /// unknown keys are rejected.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_documented_surface() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.input_dir, PathBuf::from("common_directory"));
        assert!(!cfg.delete_inputs);
        assert_eq!(cfg.database.path, PathBuf::from("database.db"));
        assert_eq!(cfg.database.table, "trades");
        assert_eq!(cfg.database.mode, WriteMode::Replace);
        assert_eq!(cfg.output_dir, PathBuf::from("output"));
        assert!(cfg.clear_output);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let toml = r#"
            input_dir = "incoming"

            [database]
            mode = "append"
        "#;
        let cfg: PipelineConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.input_dir, PathBuf::from("incoming"));
        assert_eq!(cfg.database.mode, WriteMode::Append);
        assert_eq!(cfg.database.table, "trades");
        assert!(cfg.clear_output);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"inptu_dir = "typo""#;
        assert!(toml::from_str::<PipelineConfig>(toml).is_err());
    }

    #[test]
    fn loads_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "output_dir = \"reports\"").unwrap();

        let cfg = PipelineConfig::from_toml_path(&path).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PipelineConfig::from_toml_path(Path::new("/no/such/file.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
