//! The error surface presented to UI code.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Generic text shown for anything that is not a validation failure.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Why a request failed, as far as the UI needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
  #[error("{field} {reason}")]
  Validation { field: String, reason: String },

  #[error("not signed in")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("server returned {0}")]
  Server(u16),

  #[error("transport: {0}")]
  Transport(String),

  #[error("decode: {0}")]
  Decode(String),
}

impl ClientError {
  /// Text suitable for a toast or inline form error.
  pub fn user_message(&self) -> String {
    match self {
      ClientError::Validation { .. } => self.to_string(),
      _ => GENERIC_MESSAGE.to_string(),
    }
  }

  /// Build an error from a non-2xx status and the JSON body the API sends
  /// with it. A body that fails to parse still yields the right variant.
  pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
    let body: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = body.error.unwrap_or_else(|| status.to_string());
    match status {
      StatusCode::BAD_REQUEST => ClientError::Validation {
        field:  body.field.unwrap_or_else(|| "body".into()),
        reason: body.reason.unwrap_or(message),
      },
      StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
      StatusCode::FORBIDDEN => ClientError::Forbidden,
      StatusCode::NOT_FOUND => ClientError::NotFound(message),
      StatusCode::CONFLICT => ClientError::Conflict(message),
      other => ClientError::Server(other.as_u16()),
    }
  }
}

impl From<reqwest::Error> for ClientError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() {
      ClientError::Decode(e.to_string())
    } else {
      ClientError::Transport(e.to_string())
    }
  }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  error:  Option<String>,
  field:  Option<String>,
  reason: Option<String>,
}
