//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Validation failures carry their field and reason to the client. Storage
//! failures are logged in full and rendered as a bare 500.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use meridian_core::{ValidationError, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid input: {0}")]
  Validation(#[from] ValidationError),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("payload too large")]
  PayloadTooLarge,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("object storage error: {0}")]
  Objects(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a gateway failure, keeping uniqueness conflicts distinct.
  pub fn store<E: StoreError>(e: E) -> Self {
    if e.is_conflict() {
      ApiError::Conflict(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(v) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "invalid input", "field": v.field, "reason": v.reason }),
      ),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, json!({ "error": "unauthorized" }))
      }
      ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "forbidden" })),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::PayloadTooLarge => {
        (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": "payload too large" }))
      }
      ApiError::Store(e) | ApiError::Objects(e) => {
        tracing::error!(error = %e, source = ?e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": "internal server error" }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
