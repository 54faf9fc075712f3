//! Configuration for the Meridian server binary.
//!
//! Values come from an optional TOML file, then `MERIDIAN_*` environment
//! variables (nested keys use `__`, e.g. `MERIDIAN_IDENTITY__LOGIN_URL`).
//! Every key has a default, so an empty file is a valid configuration.

use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use meridian_api::{ApiConfig, IdentityConfig};
use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_database_path")]
  pub database_path:    PathBuf,
  /// Directory holding uploaded objects. A leading `~/` is expanded.
  #[serde(default = "default_object_root")]
  pub object_root:      PathBuf,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
  #[serde(default)]
  pub identity:         IdentityConfig,
  /// Caller ids granted the admin role.
  #[serde(default)]
  pub admin_user_ids:   Vec<String>,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 5000 }
fn default_database_path() -> PathBuf { PathBuf::from("meridian.db") }
fn default_object_root() -> PathBuf { PathBuf::from("objects") }
fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The subset of settings the request handlers consult.
  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      identity:         self.identity.clone(),
      admin_user_ids:   self.admin_user_ids.iter().cloned().collect::<HashSet<_>>(),
      max_upload_bytes: self.max_upload_bytes,
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
