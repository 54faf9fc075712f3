//! Research reports offered for download.

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
pub struct Whitepaper {
  pub id:             Uuid,
  pub title:          String,
  pub description:    String,
  pub author:         String,
  pub file_url:       String,
  /// Only ever incremented, through a dedicated store operation.
  pub download_count: u64,
  pub is_published:   bool,
  pub created_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWhitepaper {
  pub title:        String,
  pub description:  String,
  pub author:       String,
  pub file_url:     String,
  pub is_published: bool,
}

impl Validate for NewWhitepaper {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    Ok(Self {
      title:        f.required_str("title")?,
      description:  f.required_str("description")?,
      author:       f.required_str("author")?,
      file_url:     f.required_str("fileUrl")?,
      is_published: f.optional_bool("isPublished")?.unwrap_or(false),
    })
  }
}
