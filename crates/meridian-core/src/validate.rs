//! Input validation for every mutating operation.
//!
//! Each insert contract implements [`Validate`], a pure function from the raw
//! JSON payload to a typed input struct. Fields the caller may not set
//! (ids, timestamps, statuses, counters, owners) are simply never read, so
//! they are dropped along with any other unknown keys.
//!
//! Coercion happens here too: dates arrive as strings and leave as
//! [`DateTime<Utc>`], blank optional strings become `None`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use strum::VariantNames;

use crate::{
  ValidationError,
  appointment::NewAppointment,
  blog::NewBlogPost,
  contact::NewContact,
  document::NewDocument,
  newsletter::NewSubscriber,
  whitepaper::NewWhitepaper,
};

// ─── Contract ────────────────────────────────────────────────────────────────

/// An insert (or update) contract derived from an entity's persisted shape.
pub trait Validate: Sized {
  fn validate(raw: &Value) -> Result<Self, ValidationError>;
}

/// The entities that accept caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  Contact,
  Newsletter,
  Document,
  BlogPost,
  Whitepaper,
  Appointment,
}

/// The output of [`validate`]: one typed insert contract per entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedInput {
  Contact(NewContact),
  Newsletter(NewSubscriber),
  Document(NewDocument),
  BlogPost(NewBlogPost),
  Whitepaper(NewWhitepaper),
  Appointment(NewAppointment),
}

/// Validate `raw` against the insert contract of `kind`.
pub fn validate(kind: EntityKind, raw: &Value) -> Result<ValidatedInput, ValidationError> {
  Ok(match kind {
    EntityKind::Contact => ValidatedInput::Contact(NewContact::validate(raw)?),
    EntityKind::Newsletter => ValidatedInput::Newsletter(NewSubscriber::validate(raw)?),
    EntityKind::Document => ValidatedInput::Document(NewDocument::validate(raw)?),
    EntityKind::BlogPost => ValidatedInput::BlogPost(NewBlogPost::validate(raw)?),
    EntityKind::Whitepaper => ValidatedInput::Whitepaper(NewWhitepaper::validate(raw)?),
    EntityKind::Appointment => {
      ValidatedInput::Appointment(NewAppointment::validate(raw)?)
    }
  })
}

// ─── Field access ────────────────────────────────────────────────────────────

/// Typed accessors over a raw JSON object.
///
/// Missing keys and explicit `null` are treated the same way.
pub struct Fields<'a> {
  map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
  pub fn new(raw: &'a Value) -> Result<Self, ValidationError> {
    raw
      .as_object()
      .map(|map| Self { map })
      .ok_or_else(|| ValidationError::new("body", "must be a JSON object"))
  }

  fn get(&self, field: &str) -> Option<&'a Value> {
    self.map.get(field).filter(|v| !v.is_null())
  }

  /// Whether `field` was supplied with a non-null value.
  pub fn contains(&self, field: &str) -> bool { self.get(field).is_some() }

  /// Whether `field` was supplied at all, `null` included.
  pub fn has_key(&self, field: &str) -> bool { self.map.contains_key(field) }

  pub fn required_str(&self, field: &str) -> Result<String, ValidationError> {
    match self.optional_raw_str(field)? {
      None => Err(ValidationError::new(field, "is required")),
      Some(s) if s.trim().is_empty() => {
        Err(ValidationError::new(field, "must not be empty"))
      }
      Some(s) => Ok(s.to_owned()),
    }
  }

  /// A string that may be absent. Blank strings are stored as absent.
  pub fn optional_str(&self, field: &str) -> Result<Option<String>, ValidationError> {
    Ok(
      self
        .optional_raw_str(field)?
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned),
    )
  }

  fn optional_raw_str(&self, field: &str) -> Result<Option<&'a str>, ValidationError> {
    match self.get(field) {
      None => Ok(None),
      Some(Value::String(s)) => Ok(Some(s.as_str())),
      Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
  }

  pub fn required_email(&self, field: &str) -> Result<String, ValidationError> {
    let email = self.required_str(field)?.trim().to_owned();
    if is_valid_email(&email) {
      Ok(email)
    } else {
      Err(ValidationError::new(field, "must be a valid email address"))
    }
  }

  pub fn required_instant(&self, field: &str) -> Result<DateTime<Utc>, ValidationError> {
    self
      .optional_instant(field)?
      .ok_or_else(|| ValidationError::new(field, "is required"))
  }

  pub fn optional_instant(
    &self,
    field: &str,
  ) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match self.optional_str(field)? {
      None => Ok(None),
      Some(s) => parse_instant(&s).map(Some).ok_or_else(|| {
        ValidationError::new(field, "must be a date (YYYY-MM-DD) or RFC 3339 timestamp")
      }),
    }
  }

  pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, ValidationError> {
    match self.get(field) {
      None => Ok(None),
      Some(Value::Bool(b)) => Ok(Some(*b)),
      Some(_) => Err(ValidationError::new(field, "must be a boolean")),
    }
  }

  /// A string enum; the accepted values are listed in the error reason.
  pub fn required_enum<E>(&self, field: &str) -> Result<E, ValidationError>
  where
    E: FromStr + VariantNames,
  {
    let raw = self.required_str(field)?;
    raw.trim().parse().map_err(|_| {
      ValidationError::new(field, format!("must be one of: {}", E::VARIANTS.join(", ")))
    })
  }
}

// ─── Coercions ───────────────────────────────────────────────────────────────

/// Accepts an RFC 3339 instant or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

/// A loose shape check: one `@`, something before it, and a
/// dotted domain after it.
pub fn is_valid_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && !s.chars().any(char::is_whitespace)
    && domain.split('.').count() >= 2
    && domain.split('.').all(|label| !label.is_empty())
}
