//! Newsletter subscriptions, keyed uniquely by email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  ValidationError,
  validate::{Fields, Validate},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
  pub id:            Uuid,
  pub email:         String,
  pub subscribed_at: DateTime<Utc>,
  pub is_active:     bool,
}

/// Body of both subscribe and unsubscribe requests.
///
/// The address is lower-cased so that the uniqueness constraint is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubscriber {
  pub email: String,
}

impl Validate for NewSubscriber {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    Ok(Self { email: f.required_email("email")?.to_lowercase() })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn email_is_normalised() {
    let s = NewSubscriber::validate(&json!({ "email": "  Ada@Example.COM " })).unwrap();
    assert_eq!(s.email, "ada@example.com");
  }

  #[test]
  fn missing_email() {
    let err = NewSubscriber::validate(&json!({})).unwrap_err();
    assert_eq!(err, ValidationError::new("email", "is required"));
  }
}
