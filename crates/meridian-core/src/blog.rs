//! Blog posts and research articles.
//!
//! A post's `slug` is its public lookup key. It is unique, and once a post
//! exists it never changes: [`BlogPostPatch`] has no slug field and rejects
//! payloads that try to set one.

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
pub struct BlogPost {
  pub id:           Uuid,
  pub title:        String,
  pub slug:         String,
  pub excerpt:      String,
  pub content:      String,
  pub author:       String,
  pub category:     String,
  pub image_url:    Option<String>,
  pub is_published: bool,
  pub published_at: Option<DateTime<Utc>>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
  pub title:        String,
  pub slug:         String,
  pub excerpt:      String,
  pub content:      String,
  pub author:       String,
  pub category:     String,
  pub image_url:    Option<String>,
  pub is_published: bool,
  pub published_at: Option<DateTime<Utc>>,
}

impl Validate for NewBlogPost {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    let slug = f.required_str("slug")?;
    if !is_valid_slug(&slug) {
      return Err(ValidationError::new(
        "slug",
        "must be lowercase letters, digits and single hyphens",
      ));
    }
    Ok(Self {
      title: f.required_str("title")?,
      slug,
      excerpt: f.required_str("excerpt")?,
      content: f.required_str("content")?,
      author: f.required_str("author")?,
      category: f.required_str("category")?,
      image_url: f.optional_str("imageUrl")?,
      is_published: f.optional_bool("isPublished")?.unwrap_or(false),
      published_at: f.optional_instant("publishedAt")?,
    })
  }
}

/// A partial edit of an existing post. `None` leaves a column untouched.
///
/// `image_url` is doubly optional: `Some(None)` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub excerpt:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url:    Option<Option<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_published: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub published_at: Option<DateTime<Utc>>,
}

impl Validate for BlogPostPatch {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    if f.has_key("slug") {
      return Err(ValidationError::new("slug", "is immutable"));
    }

    let present = |field: &str| -> Result<Option<String>, ValidationError> {
      if f.contains(field) { f.required_str(field).map(Some) } else { Ok(None) }
    };

    Ok(Self {
      title:        present("title")?,
      excerpt:      present("excerpt")?,
      content:      present("content")?,
      author:       present("author")?,
      category:     present("category")?,
      image_url:    if f.has_key("imageUrl") {
        Some(f.optional_str("imageUrl")?)
      } else {
        None
      },
      is_published: f.optional_bool("isPublished")?,
      published_at: f.optional_instant("publishedAt")?,
    })
  }
}

/// `lowercase-words-1`: ASCII lowercase and digits separated by single
/// hyphens, no leading or trailing hyphen.
pub fn is_valid_slug(s: &str) -> bool {
  !s.is_empty()
    && s.split('-').all(|part| {
      !part.is_empty()
        && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}
