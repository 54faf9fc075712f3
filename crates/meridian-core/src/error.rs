//! Error types for `meridian-core`.

use serde::Serialize;
use thiserror::Error;

/// A single rejected input field.
///
/// Carried all the way to the HTTP response so a form can point at the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
  pub field:  String,
  pub reason: String,
}

impl ValidationError {
  pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
    Self { field: field.into(), reason: reason.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
