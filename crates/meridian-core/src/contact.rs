//! Contact-form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  ValidationError,
  status::ContactStatus,
  validate::{Fields, Validate},
};

/// A persisted contact-form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:             Uuid,
  pub name:           String,
  pub email:          String,
  pub phone:          Option<String>,
  pub subject:        String,
  pub message:        String,
  pub preferred_date: Option<DateTime<Utc>>,
  pub preferred_time: Option<String>,
  pub status:         ContactStatus,
  pub created_at:     DateTime<Utc>,
}

/// Insert contract for [`Contact`]. The store assigns `id`, `status` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
  pub name:           String,
  pub email:          String,
  pub phone:          Option<String>,
  pub subject:        String,
  pub message:        String,
  pub preferred_date: Option<DateTime<Utc>>,
  pub preferred_time: Option<String>,
}

impl Validate for NewContact {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    Ok(Self {
      name:           f.required_str("name")?,
      email:          f.required_email("email")?,
      phone:          f.optional_str("phone")?,
      subject:        f.required_str("subject")?,
      message:        f.required_str("message")?,
      preferred_date: f.optional_instant("preferredDate")?,
      preferred_time: f.optional_str("preferredTime")?,
    })
  }
}
