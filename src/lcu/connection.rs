// LCU connection discovery: port and auth token of the running League client

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;
use base64::{engine::general_purpose, Engine};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

pub const APP_PORT_ARG: &str = "app-port";
pub const AUTH_TOKEN_ARG: &str = "remoting-auth-token";

const LOCKFILE_NAMES: [&str; 3] = ["lockfile", "LeagueClientUx.lockfile", "LeagueClient.lockfile"];

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

#[derive(Clone, PartialEq, Eq)]
pub struct LcuConnection {
  pub port: u16,
  pub token: String,
}

// Keep the token out of logs
impl fmt::Debug for LcuConnection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LcuConnection")
      .field("port", &self.port)
      .field("token", &"<redacted>")
      .finish()
  }
}

impl LcuConnection {
  /// Build a connection from `--key=value` pairs parsed off the client command line.
  pub fn from_args(args: &HashMap<String, String>) -> Result<Self> {
    let port = args
      .get(APP_PORT_ARG)
      .ok_or_else(|| Error::Connection(format!("--{} not found in client arguments", APP_PORT_ARG)))?;
    let port = parse_port(port)?;

    let token = args
      .get(AUTH_TOKEN_ARG)
      .map(|t| t.trim())
      .filter(|t| !t.is_empty())
      .ok_or_else(|| {
        Error::Connection(format!("--{} not found in client arguments", AUTH_TOKEN_ARG))
      })?;

    Ok(Self {
      port,
      token: token.to_string(),
    })
  }

  /// Parse lockfile contents: `name:pid:port:password:protocol`.
  pub fn from_lockfile(content: &str) -> Result<Self> {
    let parts: Vec<&str> = content.trim().split(':').collect();
    if parts.len() < 5 {
      return Err(Error::Connection(format!(
        "Malformed lockfile: expected 5 fields, found {}",
        parts.len()
      )));
    }
    let token = parts[3].trim();
    if token.is_empty() {
      return Err(Error::Connection("Lockfile has an empty password".to_string()));
    }
    Ok(Self {
      port: parse_port(parts[2])?,
      token: token.to_string(),
    })
  }

  /// Value of the `Authorization` header: HTTP Basic with `username` and the token.
  pub fn basic_auth_header(&self, username: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, self.token));
    format!("Basic {}", encoded)
  }
}

fn parse_port(raw: &str) -> Result<u16> {
  match raw.trim().parse::<u16>() {
    Ok(port) if port != 0 => Ok(port),
    _ => Err(Error::Connection(format!("Invalid client port: {:?}", raw))),
  }
}

/// Split a command line into `--key=value` pairs. Quotes group whitespace and are stripped.
pub fn parse_command_line(line: &str) -> HashMap<String, String> {
  let mut args = HashMap::new();
  for token in tokenize(line) {
    let Some(stripped) = token.strip_prefix("--") else {
      continue;
    };
    if let Some((key, value)) = stripped.split_once('=') {
      args.insert(key.to_string(), value.to_string());
    }
  }
  args
}

fn tokenize(line: &str) -> Vec<String> {
  let mut tokens = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;

  for c in line.chars() {
    match c {
      '"' => in_quotes = !in_quotes,
      c if c.is_whitespace() && !in_quotes => {
        if !current.is_empty() {
          tokens.push(std::mem::take(&mut current));
        }
      }
      c => current.push(c),
    }
  }
  if !current.is_empty() {
    tokens.push(current);
  }
  tokens
}

/// Platform shim returning the command lines of processes named `process_name`.
pub trait ProcessInspector: Send + Sync {
  fn command_lines(&self, process_name: &str) -> Result<Vec<String>>;
}

pub struct SystemProcessInspector;

impl ProcessInspector for SystemProcessInspector {
  #[cfg(target_os = "windows")]
  fn command_lines(&self, process_name: &str) -> Result<Vec<String>> {
    let exe = format!("{}.exe", process_name);
    let wmic = Command::new("wmic")
      .args(["PROCESS", "WHERE", &format!("name='{}'", exe), "GET", "commandline"])
      .creation_flags(CREATE_NO_WINDOW)
      .output();

    let stdout = match wmic {
      Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).to_string(),
      _ => {
        // wmic is gone on recent Windows builds
        let output = Command::new("powershell")
          .args([
            "-NoProfile",
            "-Command",
            &format!(
              "Get-CimInstance Win32_Process -Filter \"name = '{}'\" | Select-Object -ExpandProperty CommandLine",
              exe
            ),
          ])
          .creation_flags(CREATE_NO_WINDOW)
          .output()
          .map_err(|e| Error::Connection(format!("Failed to execute powershell command: {}", e)))?;
        String::from_utf8_lossy(&output.stdout).to_string()
      }
    };

    Ok(
      stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case("commandline"))
        .map(str::to_string)
        .collect(),
    )
  }

  #[cfg(not(target_os = "windows"))]
  fn command_lines(&self, process_name: &str) -> Result<Vec<String>> {
    let output = Command::new("ps")
      .args(["-A", "-o", "args="])
      .output()
      .map_err(|e| Error::Connection(format!("Failed to execute ps: {}", e)))?;

    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| l.contains(process_name))
        .map(str::to_string)
        .collect(),
    )
  }
}

/// Find the client's port and token: command line first, lockfile second.
pub fn resolve_local_endpoint(inspector: &dyn ProcessInspector, config: &Config) -> Result<LcuConnection> {
  let mut last_error = None;

  match inspector.command_lines(&config.process_name) {
    Ok(lines) => {
      for line in &lines {
        match LcuConnection::from_args(&parse_command_line(line)) {
          Ok(conn) => {
            tracing::info!("Found {} on port {}", config.process_name, conn.port);
            return Ok(conn);
          }
          Err(e) => last_error = Some(e),
        }
      }
      if lines.is_empty() {
        tracing::debug!("No running {} process", config.process_name);
      }
    }
    Err(e) => {
      tracing::debug!("Process inspection failed: {}", e);
      last_error = Some(e);
    }
  }

  if let Some(league_path) = &config.league_path {
    if let Some(conn) = read_lockfile(Path::new(league_path)) {
      tracing::info!("Using lockfile credentials on port {}", conn.port);
      return Ok(conn);
    }
  }

  Err(last_error.unwrap_or_else(|| {
    Error::Connection(format!("{} is not running", config.process_name))
  }))
}

/// Read the first parseable lockfile in `dir`, if any.
pub fn read_lockfile(dir: &Path) -> Option<LcuConnection> {
  for name in LOCKFILE_NAMES {
    let path: PathBuf = dir.join(name);
    if let Ok(content) = std::fs::read_to_string(&path) {
      match LcuConnection::from_lockfile(&content) {
        Ok(conn) => return Some(conn),
        Err(e) => tracing::warn!("Ignoring {}: {}", path.display(), e),
      }
    }
  }
  None
}
