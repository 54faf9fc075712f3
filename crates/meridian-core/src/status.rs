//! Status enums and the status-update contract.
//!
//! Statuses have no transition graph: any value may overwrite any other.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::VariantNames;

use crate::{Error, Result, ValidationError, validate::Fields};

/// Lifecycle of a contact-form submission.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
  #[default]
  New,
  Contacted,
  Closed,
}

/// Lifecycle of a consultation booking.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppointmentStatus {
  #[default]
  Pending,
  Confirmed,
  Cancelled,
}

/// Review state of an uploaded client document.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentStatus {
  #[default]
  Pending,
  Verified,
  Rejected,
}

/// Parse a stored enum column, naming the column kind on failure.
pub fn parse_variant<E: FromStr>(kind: &'static str, value: &str) -> Result<E> {
  value.parse().map_err(|_| Error::UnknownVariant {
    kind,
    value: value.to_owned(),
  })
}

// ─── Update contract ─────────────────────────────────────────────────────────

/// Body of a status-update request: `{"status": "...", "reviewNotes": "..."}`.
///
/// `review_notes` is only persisted for documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate<S> {
  pub status:       S,
  pub review_notes: Option<String>,
}

impl<S> StatusUpdate<S>
where
  S: FromStr + VariantNames,
{
  pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    Ok(Self {
      status:       f.required_enum("status")?,
      review_notes: f.optional_str("reviewNotes")?,
    })
  }
}
