//! Client documents (KYC paperwork, agreements, …).
//!
//! Only metadata lives here. The bytes are held by an
//! [`ObjectStorage`](crate::objects::ObjectStorage) backend and referenced
//! through `object_path`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  ValidationError,
  status::DocumentStatus,
  validate::{Fields, Validate},
};

#[derive(
  Debug,
  Clone,
  Copy,
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
pub enum DocumentType {
  Kyc,
  Identification,
  ProofOfAddress,
  Agreement,
  Other,
}

/// A persisted document record, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  pub id:           Uuid,
  /// Identity of the owner, as issued by the external identity provider.
  pub user_id:      String,
  pub name:         String,
  #[serde(rename = "type")]
  pub doc_type:     DocumentType,
  pub object_path:  String,
  pub status:       DocumentStatus,
  pub uploaded_at:  DateTime<Utc>,
  pub reviewed_at:  Option<DateTime<Utc>>,
  pub review_notes: Option<String>,
}

/// Insert contract for [`Document`].
///
/// There is no `user_id` here; the owner always comes from the
/// caller's resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
  pub name:        String,
  #[serde(rename = "type")]
  pub doc_type:    DocumentType,
  pub object_path: String,
}

impl Validate for NewDocument {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    Ok(Self {
      name:        f.required_str("name")?,
      doc_type:    f.required_enum("type")?,
      object_path: f.required_str("objectPath")?,
    })
  }
}
