use std::io;

// Error handling for every client and catalog operation

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The League client could not be located or its credentials could not be read.
  #[error("Connection error: {0}")]
  Connection(String),

  /// A single request failed. `status` is set when the service answered with a non-2xx code.
  #[error("{operation} failed{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
  Transport {
    operation: String,
    status: Option<u16>,
    message: String,
  },

  #[error("{operation} timed out")]
  Timeout { operation: String },

  #[error("Invalid input: {0}")]
  Validation(String),

  #[error("Champ select state conflict: {0}")]
  StateConflict(String),

  /// The champion was hovered but locking it in failed; retry with `complete_action`.
  #[error("Champion hovered on action {action_id} but lock-in failed: {source}")]
  PartialCommit {
    action_id: i64,
    #[source]
    source: Box<Error>,
  },

  #[error("Player not found: {0}")]
  PlayerNotFound(String),

  #[error("Catalog error: {0}")]
  Catalog(String),

  #[error("IO Error: {0}")]
  Io(#[from] io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Transport {
      operation: operation.into(),
      status: None,
      message: message.into(),
    }
  }

  /// HTTP status carried by a transport failure, if the service answered at all.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Transport { status, .. } => *status,
      Self::PartialCommit { source, .. } => source.status(),
      _ => None,
    }
  }

  /// Whether the same call may succeed if the caller tries again later.
  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      Self::Connection(_) | Self::Transport { .. } | Self::Timeout { .. } | Self::PartialCommit { .. }
    )
  }
}

pub type Result<T> = std::result::Result<T, Error>;
