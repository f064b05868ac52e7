//! Configuration management for identa
//!
//! Settings come from a JSON file, then `IDENTA_HOME` overrides where the
//! history is stored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::input::InputPolicy;
use crate::storage::{JsonFileStorage, STORAGE_FILE};
use crate::store::CorruptionPolicy;

/// Environment variable naming the directory that holds the history file
pub const HOME_ENV: &str = "IDENTA_HOME";

const CONFIG_PATHS: [&str; 2] = ["identa.json", ".identa.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// History file; defaults to the user data directory
  pub storage_path: Option<PathBuf>,
  pub input_policy: InputPolicy,
  pub corruption_policy: CorruptionPolicy,
}

impl Config {
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
      .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
  }

  /// Load from the working directory, then the user config directory, else defaults
  pub fn load() -> Result<Self, ConfigError> {
    for path in CONFIG_PATHS {
      if Path::new(path).exists() {
        return Self::load_from_file(path);
      }
    }

    if let Some(path) = dirs::config_dir().map(|dir| dir.join("identa").join("config.json")) {
      if path.exists() {
        return Self::load_from_file(path);
      }
    }

    Ok(Self::default())
  }

  /// Where the history lives: `IDENTA_HOME`, then `storage_path`, then the data dir
  pub fn resolve_storage_path(&self) -> Result<PathBuf, ConfigError> {
    if let Ok(home) = std::env::var(HOME_ENV) {
      return Ok(PathBuf::from(home).join(STORAGE_FILE));
    }

    if let Some(path) = &self.storage_path {
      return Ok(path.clone());
    }

    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(data_dir.join("identa").join(STORAGE_FILE))
  }

  pub fn storage(&self) -> Result<JsonFileStorage, ConfigError> {
    Ok(JsonFileStorage::new(self.resolve_storage_path()?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  fn test_partial_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("identa.json");
    std::fs::write(&path, r#"{ "input_policy": "strict" }"#).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.input_policy, InputPolicy::Strict);
    assert_eq!(config.corruption_policy, CorruptionPolicy::TreatAsEmpty);
    assert_eq!(config.storage_path, None);
  }

  #[test]
  fn test_corruption_policy_kebab_case() {
    let config: Config = serde_json::from_str(r#"{ "corruption_policy": "fail" }"#).unwrap();
    assert_eq!(config.corruption_policy, CorruptionPolicy::Fail);
    let config: Config =
      serde_json::from_str(r#"{ "corruption_policy": "treat-as-empty" }"#).unwrap();
    assert_eq!(config.corruption_policy, CorruptionPolicy::TreatAsEmpty);
  }

  #[test]
  fn test_invalid_file_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    std::fs::write(&path, "{ nope").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
  }

  #[test]
  #[serial]
  fn test_home_env_overrides_storage_path() {
    let temp = TempDir::new().unwrap();
    std::env::set_var(HOME_ENV, temp.path());
    let config = Config { storage_path: Some(PathBuf::from("/elsewhere.json")), ..Config::default() };

    let resolved = config.resolve_storage_path().unwrap();
    std::env::remove_var(HOME_ENV);

    assert_eq!(resolved, temp.path().join(STORAGE_FILE));
  }

  #[test]
  #[serial]
  fn test_storage_path_used_without_env() {
    std::env::remove_var(HOME_ENV);
    let config = Config { storage_path: Some(PathBuf::from("/tmp/custom.json")), ..Config::default() };
    assert_eq!(config.resolve_storage_path().unwrap(), PathBuf::from("/tmp/custom.json"));
  }
}
