//! Runtime configuration: an optional TOML file layered under `CHURN_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

use crate::extract::{DEMOGRAPHICS_FILE, SERVICES_FILE};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EtlConfig {
  /// SQLite warehouse file. A leading `~/` is expanded.
  #[serde(default = "default_database_path")]
  pub database_path:     PathBuf,
  #[serde(default = "default_demographics_file")]
  pub demographics_file: PathBuf,
  #[serde(default = "default_services_file")]
  pub services_file:     PathBuf,
  /// Clear the staging relations before loading new files.
  #[serde(default = "default_truncate_staging")]
  pub truncate_staging:  bool,
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms:   u64,
}

fn default_database_path() -> PathBuf { PathBuf::from("churn.db") }
fn default_demographics_file() -> PathBuf { PathBuf::from(DEMOGRAPHICS_FILE) }
fn default_services_file() -> PathBuf { PathBuf::from(SERVICES_FILE) }
fn default_truncate_staging() -> bool { true }
fn default_busy_timeout_ms() -> u64 { 5_000 }

impl EtlConfig {
  /// Load from `file` (if it exists) and the environment. Environment
  /// variables win, e.g. `CHURN_DATABASE_PATH=/tmp/w.db`.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("CHURN"))
      .build()?
      .try_deserialize()
  }

  pub fn busy_timeout(&self) -> Duration { Duration::from_millis(self.busy_timeout_ms) }

  pub fn database_path(&self) -> PathBuf { expand_tilde(&self.database_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
