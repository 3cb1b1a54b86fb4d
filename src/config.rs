use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

// Configuration management - stored as config.json in the platform config directory

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  /// League install directory; only used to find the lockfile when process inspection fails.
  #[serde(default)]
  pub league_path: Option<String>,
  #[serde(default = "default_process_name")]
  pub process_name: String,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  #[serde(default = "default_live_client_port")]
  pub live_client_port: u16,
  /// Both local services present self-signed certificates.
  #[serde(default = "default_accept_invalid_certs")]
  pub accept_invalid_certs: bool,
  #[serde(default = "default_user_agent")]
  pub user_agent: String,
  #[serde(default = "default_auth_username")]
  pub auth_username: String,
  #[serde(default)]
  pub cache_dir: Option<PathBuf>,
  #[serde(default = "default_locale")]
  pub locale: String,
  #[serde(default = "default_ddragon_base_url")]
  pub ddragon_base_url: String,
}

fn default_process_name() -> String {
  "LeagueClientUx".to_string()
}

fn default_request_timeout_secs() -> u64 {
  5
}

fn default_live_client_port() -> u16 {
  2999
}

fn default_accept_invalid_certs() -> bool {
  true
}

fn default_user_agent() -> String {
  format!("lcu-bravery/{}", env!("CARGO_PKG_VERSION"))
}

fn default_auth_username() -> String {
  "riot".to_string()
}

fn default_locale() -> String {
  "en_US".to_string()
}

fn default_ddragon_base_url() -> String {
  "https://ddragon.leagueoflegends.com".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      league_path: None,
      process_name: default_process_name(),
      request_timeout_secs: default_request_timeout_secs(),
      live_client_port: default_live_client_port(),
      accept_invalid_certs: default_accept_invalid_certs(),
      user_agent: default_user_agent(),
      auth_username: default_auth_username(),
      cache_dir: None,
      locale: default_locale(),
      ddragon_base_url: default_ddragon_base_url(),
    }
  }
}

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("com", "lcu-bravery", "lcu-bravery")
}

impl Config {
  /// Default location of config.json, if the platform has a config directory.
  pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
  }

  /// Load config from `path` (or the default location). A missing file yields the defaults.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let file = match path {
      Some(p) => p.to_path_buf(),
      None => match Self::default_path() {
        Some(p) => p,
        None => return Ok(Self::default()),
      },
    };

    if !file.exists() {
      tracing::debug!("No config at {}, using defaults", file.display());
      return Ok(Self::default());
    }

    let content = fs::read_to_string(&file)?;
    let config: Config = serde_json::from_str(&content)?;
    tracing::debug!("Loaded config from {}", file.display());
    Ok(config)
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(self)?;
    fs::write(path, data)?;
    Ok(())
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  /// Directory holding downloaded Data Dragon archives and derived tables.
  pub fn resolved_cache_dir(&self) -> PathBuf {
    if let Some(dir) = &self.cache_dir {
      return dir.clone();
    }
    project_dirs()
      .map(|dirs| dirs.cache_dir().join("ddragon"))
      .unwrap_or_else(|| PathBuf::from(".").join("ddragon"))
  }
}
