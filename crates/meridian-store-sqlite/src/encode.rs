//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! and a `Z` suffix. UUIDs are stored as hyphenated lowercase strings. Enums
//! use their snake_case wire names. Rows are first read into `Raw*` structs
//! of primitive values on the connection thread, then decoded here.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use meridian_core::{
  appointment::Appointment,
  blog::BlogPost,
  contact::Contact,
  document::Document,
  newsletter::Newsletter,
  status::parse_variant,
  whitepaper::Whitepaper,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current instant at storage precision, so a value handed back to a
/// caller equals the value later read from disk.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, \
                                   preferred_date, preferred_time, status, created_at";

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub id:             String,
  pub name:           String,
  pub email:          String,
  pub phone:          Option<String>,
  pub subject:        String,
  pub message:        String,
  pub preferred_date: Option<String>,
  pub preferred_time: Option<String>,
  pub status:         String,
  pub created_at:     String,
}

impl RawContact {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      phone:          row.get(3)?,
      subject:        row.get(4)?,
      message:        row.get(5)?,
      preferred_date: row.get(6)?,
      preferred_time: row.get(7)?,
      status:         row.get(8)?,
      created_at:     row.get(9)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:             decode_uuid(&self.id)?,
      name:           self.name,
      email:          self.email,
      phone:          self.phone,
      subject:        self.subject,
      message:        self.message,
      preferred_date: decode_opt_dt(self.preferred_date)?,
      preferred_time: self.preferred_time,
      status:         parse_variant("contact status", &self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const NEWSLETTER_COLUMNS: &str = "id, email, subscribed_at, is_active";

pub struct RawNewsletter {
  pub id:            String,
  pub email:         String,
  pub subscribed_at: String,
  pub is_active:     bool,
}

impl RawNewsletter {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      subscribed_at: row.get(2)?,
      is_active:     row.get(3)?,
    })
  }

  pub fn into_newsletter(self) -> Result<Newsletter> {
    Ok(Newsletter {
      id:            decode_uuid(&self.id)?,
      email:         self.email,
      subscribed_at: decode_dt(&self.subscribed_at)?,
      is_active:     self.is_active,
    })
  }
}

pub const DOCUMENT_COLUMNS: &str = "id, user_id, name, type, object_path, status, \
                                    uploaded_at, reviewed_at, review_notes";

pub struct RawDocument {
  pub id:           String,
  pub user_id:      String,
  pub name:         String,
  pub doc_type:     String,
  pub object_path:  String,
  pub status:       String,
  pub uploaded_at:  String,
  pub reviewed_at:  Option<String>,
  pub review_notes: Option<String>,
}

impl RawDocument {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      user_id:      row.get(1)?,
      name:         row.get(2)?,
      doc_type:     row.get(3)?,
      object_path:  row.get(4)?,
      status:       row.get(5)?,
      uploaded_at:  row.get(6)?,
      reviewed_at:  row.get(7)?,
      review_notes: row.get(8)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      id:           decode_uuid(&self.id)?,
      user_id:      self.user_id,
      name:         self.name,
      doc_type:     parse_variant("document type", &self.doc_type)?,
      object_path:  self.object_path,
      status:       parse_variant("document status", &self.status)?,
      uploaded_at:  decode_dt(&self.uploaded_at)?,
      reviewed_at:  decode_opt_dt(self.reviewed_at)?,
      review_notes: self.review_notes,
    })
  }
}

pub const BLOG_POST_COLUMNS: &str = "id, title, slug, excerpt, content, author, category, \
                                     image_url, is_published, published_at, created_at, \
                                     updated_at";

pub struct RawBlogPost {
  pub id:           String,
  pub title:        String,
  pub slug:         String,
  pub excerpt:      String,
  pub content:      String,
  pub author:       String,
  pub category:     String,
  pub image_url:    Option<String>,
  pub is_published: bool,
  pub published_at: Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawBlogPost {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      title:        row.get(1)?,
      slug:         row.get(2)?,
      excerpt:      row.get(3)?,
      content:      row.get(4)?,
      author:       row.get(5)?,
      category:     row.get(6)?,
      image_url:    row.get(7)?,
      is_published: row.get(8)?,
      published_at: row.get(9)?,
      created_at:   row.get(10)?,
      updated_at:   row.get(11)?,
    })
  }

  pub fn into_blog_post(self) -> Result<BlogPost> {
    Ok(BlogPost {
      id:           decode_uuid(&self.id)?,
      title:        self.title,
      slug:         self.slug,
      excerpt:      self.excerpt,
      content:      self.content,
      author:       self.author,
      category:     self.category,
      image_url:    self.image_url,
      is_published: self.is_published,
      published_at: decode_opt_dt(self.published_at)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub const WHITEPAPER_COLUMNS: &str = "id, title, description, author, file_url, \
                                      download_count, is_published, created_at";

pub struct RawWhitepaper {
  pub id:             String,
  pub title:          String,
  pub description:    String,
  pub author:         String,
  pub file_url:       String,
  pub download_count: i64,
  pub is_published:   bool,
  pub created_at:     String,
}

impl RawWhitepaper {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      title:          row.get(1)?,
      description:    row.get(2)?,
      author:         row.get(3)?,
      file_url:       row.get(4)?,
      download_count: row.get(5)?,
      is_published:   row.get(6)?,
      created_at:     row.get(7)?,
    })
  }

  pub fn into_whitepaper(self) -> Result<Whitepaper> {
    Ok(Whitepaper {
      id:             decode_uuid(&self.id)?,
      title:          self.title,
      description:    self.description,
      author:         self.author,
      file_url:       self.file_url,
      download_count: u64::try_from(self.download_count).map_err(|_| {
        Error::Decode(format!("negative download count {}", self.download_count))
      })?,
      is_published:   self.is_published,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const APPOINTMENT_COLUMNS: &str = "id, name, email, phone, preferred_date, \
                                       preferred_time, service_type, message, status, \
                                       created_at";

pub struct RawAppointment {
  pub id:             String,
  pub name:           String,
  pub email:          String,
  pub phone:          Option<String>,
  pub preferred_date: String,
  pub preferred_time: String,
  pub service_type:   String,
  pub message:        Option<String>,
  pub status:         String,
  pub created_at:     String,
}

impl RawAppointment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      phone:          row.get(3)?,
      preferred_date: row.get(4)?,
      preferred_time: row.get(5)?,
      service_type:   row.get(6)?,
      message:        row.get(7)?,
      status:         row.get(8)?,
      created_at:     row.get(9)?,
    })
  }

  pub fn into_appointment(self) -> Result<Appointment> {
    Ok(Appointment {
      id:             decode_uuid(&self.id)?,
      name:           self.name,
      email:          self.email,
      phone:          self.phone,
      preferred_date: decode_dt(&self.preferred_date)?,
      preferred_time: self.preferred_time,
      service_type:   self.service_type,
      message:        self.message,
      status:         parse_variant("appointment status", &self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}
