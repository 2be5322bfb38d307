// lib/src/config/config_structs.rs

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};
use models::errors::{CareError, CareResult};
use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngineType {
    /// Volatile; everything is lost when the process exits.
    InMemory,
    /// A single JSON document holding every collection.
    JsonFile,
    Sled,
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageEngineType::InMemory => "in_memory",
            StorageEngineType::JsonFile => "json_file",
            StorageEngineType::Sled => "sled",
        })
    }
}

impl FromStr for StorageEngineType {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(StorageEngineType::InMemory),
            "json_file" | "jsonfile" | "json" => Ok(StorageEngineType::JsonFile),
            "sled" => Ok(StorageEngineType::Sled),
            other => Err(CareError::ConfigurationError(format!("Unknown storage engine type: {}", other))),
        }
    }
}

/// What the authorization editor does with doctor ids that are not on the
/// roster and specializations outside the fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationValidation {
    /// Store the values as given.
    Accept,
    /// Silently remove unknown values before storing.
    Drop,
    /// Fail the whole edit; nothing is stored.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_engine_type")]
    pub storage_engine_type: StorageEngineType,
    #[serde(default = "default_data_directory")]
    pub data_directory: PathBuf,
    #[serde(default = "default_authorization_validation")]
    pub authorization_validation: AuthorizationValidation,
    /// Sled page cache size in bytes.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            storage_engine_type: default_storage_engine_type(),
            data_directory: default_data_directory(),
            authorization_validation: default_authorization_validation(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl StorageConfig {
    /// Path of the JSON document used by the `json_file` engine.
    pub fn store_file(&self) -> PathBuf {
        self.data_directory.join(DEFAULT_STORE_FILE_NAME)
    }

    /// Directory handed to sled by the `sled` engine.
    pub fn sled_path(&self) -> PathBuf {
        self.data_directory.join(DEFAULT_SLED_DIRECTORY_NAME)
    }
}

/// Loads the storage configuration from YAML. With `None` the default file
/// name in the working directory is tried; a missing file yields defaults.
pub fn load_storage_config_from_yaml(path: Option<&Path>) -> CareResult<StorageConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        info!("No config file at {:?}, using defaults", path);
        return Ok(StorageConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: StorageConfig = serde_yaml::from_str(&content).map_err(|e| {
        CareError::ConfigurationError(format!("Failed to parse {:?}: {}", path, e))
    })?;
    debug!("Loaded storage config from {:?}: {:?}", path, config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn should_fall_back_to_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_storage_config_from_yaml(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config, StorageConfig::default());
        assert_eq!(config.storage_engine_type, StorageEngineType::JsonFile);
        assert_eq!(config.authorization_validation, AuthorizationValidation::Accept);
    }

    #[test]
    fn should_fill_missing_keys_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "storage_engine_type: sled").unwrap();
        writeln!(file, "authorization_validation: reject").unwrap();
        let config = load_storage_config_from_yaml(Some(file.path())).unwrap();
        assert_eq!(config.storage_engine_type, StorageEngineType::Sled);
        assert_eq!(config.authorization_validation, AuthorizationValidation::Reject);
        assert_eq!(config.data_directory, default_data_directory());
        assert_eq!(config.sled_path(), default_data_directory().join("sled"));
    }

    #[test]
    fn should_report_malformed_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "storage_engine_type: [not, an, engine]").unwrap();
        let result = load_storage_config_from_yaml(Some(file.path()));
        assert!(matches!(result, Err(CareError::ConfigurationError(_))));
    }

    #[test]
    fn should_parse_engine_names() {
        assert_eq!("json-file".parse::<StorageEngineType>().unwrap(), StorageEngineType::JsonFile);
        assert_eq!("in_memory".parse::<StorageEngineType>().unwrap(), StorageEngineType::InMemory);
        assert!("rocksdb".parse::<StorageEngineType>().is_err());
    }
}
