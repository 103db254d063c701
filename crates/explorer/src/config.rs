//! Configuration management for the explorer
//!
//! Settings come from a JSON file (explicit path, or the first of the
//! well-known locations that exists) and are then overridden by
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExplorerError, Result};

const CONFIG_PATHS: [&str; 2] = [".explorer.json", "explorer.json"];
const IN_MEMORY_DATABASE: &str = ":memory:";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
  #[serde(default)]
  pub completion: CompletionConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  #[serde(default)]
  pub runner: RunnerConfig,
  #[serde(default)]
  pub server: ServerConfig,
}

/// Completion provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
  /// Base URL of an OpenAI-compatible API
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_model")]
  pub model: String,
  /// Never written back out; usually supplied through `OPENAI_API_KEY`
  #[serde(default, skip_serializing)]
  pub api_key: Option<String>,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  #[serde(default = "default_max_tokens")]
  pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
  #[default]
  Sqlite,
  Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
  #[serde(default)]
  pub backend: StorageBackend,
  /// SQLite database file, `~/.explorer/experiments.db` when unset
  #[serde(default)]
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
  /// Maximum completions in flight for one sweep
  #[serde(default = "default_concurrency")]
  pub concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_bind")]
  pub bind: String,
}

fn default_base_url() -> String {
  "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
  "gpt-3.5-turbo".to_string()
}
fn default_timeout_secs() -> u64 {
  60
}
fn default_max_tokens() -> u32 {
  500
}
fn default_concurrency() -> usize {
  10
}
fn default_bind() -> String {
  "127.0.0.1:3000".to_string()
}

impl Default for CompletionConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      model: default_model(),
      api_key: None,
      timeout_secs: default_timeout_secs(),
      max_tokens: default_max_tokens(),
    }
  }
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self { concurrency: default_concurrency() }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self { bind: default_bind() }
  }
}

impl StorageConfig {
  pub fn memory() -> Self {
    Self { backend: StorageBackend::Memory, path: None }
  }

  pub fn sqlite(path: impl Into<PathBuf>) -> Self {
    Self { backend: StorageBackend::Sqlite, path: Some(path.into()) }
  }

  /// Resolved location of the SQLite database file
  pub fn database_path(&self) -> PathBuf {
    self.path.clone().unwrap_or_else(|| explorer_home().join("experiments.db"))
  }
}

impl ExplorerConfig {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|e| ExplorerError::config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
      .map_err(|e| ExplorerError::config(format!("invalid config {}: {e}", path.display())))
  }

  /// Load configuration from `explicit`, the well-known locations or
  /// defaults, then apply environment overrides
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let mut config = match explicit {
      Some(path) => Self::load_from_file(path)?,
      None => match Self::find_config_file() {
        Some(path) => {
          debug!(path = %path.display(), "loading configuration");
          Self::load_from_file(&path)?
        }
        None => Self::default(),
      },
    };

    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    CONFIG_PATHS
      .iter()
      .map(PathBuf::from)
      .chain(std::iter::once(explorer_home().join("config.json")))
      .find(|path| path.exists())
  }

  /// Apply overrides looked up through `var`
  pub fn apply_overrides<F>(&mut self, var: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

    if let Some(key) = var("OPENAI_API_KEY") {
      self.completion.api_key = Some(key);
    }
    if let Some(url) = var("EXPLORER_BASE_URL") {
      self.completion.base_url = url;
    }
    if let Some(model) = var("EXPLORER_MODEL") {
      self.completion.model = model;
    }
    if let Some(database) = var("EXPLORER_DATABASE") {
      self.storage = if database == IN_MEMORY_DATABASE {
        StorageConfig::memory()
      } else {
        StorageConfig::sqlite(database)
      };
    }
  }
}

/// Directory holding the default database and user config
pub fn explorer_home() -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join(".explorer")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;
  use tempfile::TempDir;

  #[test]
  fn test_defaults() {
    let config = ExplorerConfig::default();
    assert_eq!(config.completion.model, "gpt-3.5-turbo");
    assert_eq!(config.completion.max_tokens, 500);
    assert_eq!(config.runner.concurrency, 10);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert!(config.storage.database_path().ends_with(".explorer/experiments.db"));
  }

  #[test]
  fn test_partial_file_uses_field_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("explorer.json");
    std::fs::write(&path, r#"{"completion": {"model": "gpt-4o-mini"}, "runner": {}}"#).unwrap();

    let config = ExplorerConfig::load_from_file(&path).unwrap();
    assert_eq!(config.completion.model, "gpt-4o-mini");
    assert_eq!(config.completion.base_url, "https://api.openai.com/v1");
    assert_eq!(config.runner.concurrency, 10);
    assert_eq!(config.server.bind, "127.0.0.1:3000");
  }

  #[test]
  fn test_invalid_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("explorer.json");
    std::fs::write(&path, "{not json").unwrap();

    let error = ExplorerConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(error, ExplorerError::Config { .. }));
  }

  #[test]
  fn test_overrides() {
    let vars: HashMap<&str, &str> = HashMap::from([
      ("OPENAI_API_KEY", "sk-test"),
      ("EXPLORER_MODEL", "local-model"),
      ("EXPLORER_BASE_URL", ""),
      ("EXPLORER_DATABASE", ":memory:"),
    ]);

    let mut config = ExplorerConfig::default();
    config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(config.completion.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.completion.model, "local-model");
    assert_eq!(config.completion.base_url, "https://api.openai.com/v1");
    assert_eq!(config.storage, StorageConfig::memory());
  }

  #[test]
  fn test_database_override_with_path() {
    let mut config = ExplorerConfig::default();
    config.apply_overrides(|key| (key == "EXPLORER_DATABASE").then(|| "/data/sweeps.db".to_string()));

    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.database_path(), PathBuf::from("/data/sweeps.db"));
  }

  #[test]
  fn test_api_key_is_not_serialized() {
    let mut config = ExplorerConfig::default();
    config.completion.api_key = Some("sk-secret".to_string());

    let json = serde_json::to_string(&config).unwrap();
    assert!(!json.contains("sk-secret"));
  }
}
