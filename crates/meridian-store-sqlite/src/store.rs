//! [`SqliteStore`]: the SQLite implementation of [`Gateway`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, Row};
use uuid::Uuid;

use meridian_core::{
  appointment::{Appointment, NewAppointment},
  blog::{BlogPost, BlogPostPatch, NewBlogPost},
  contact::{Contact, NewContact},
  document::{Document, NewDocument},
  newsletter::{NewSubscriber, Newsletter},
  status::{AppointmentStatus, ContactStatus, DocumentStatus},
  store::Gateway,
  whitepaper::{NewWhitepaper, Whitepaper},
};

use crate::{
  Error, Result,
  encode::{
    APPOINTMENT_COLUMNS, BLOG_POST_COLUMNS, CONTACT_COLUMNS, DOCUMENT_COLUMNS,
    NEWSLETTER_COLUMNS, RawAppointment, RawBlogPost, RawContact, RawDocument,
    RawNewsletter, RawWhitepaper, WHITEPAPER_COLUMNS, encode_dt, encode_uuid, now,
  },
  schema::SCHEMA,
};

type RowMapper<R> = fn(&Row<'_>) -> rusqlite::Result<R>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Meridian gateway backed by a single SQLite file.
///
/// Cheap to clone; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a SELECT and collect every row through `map`.
  async fn fetch_all<R>(
    &self,
    sql: String,
    params: Vec<String>,
    map: RowMapper<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run a single-row statement (SELECT or `… RETURNING`) through `map`.
  async fn fetch_optional<R>(
    &self,
    sql: String,
    params: Vec<String>,
    map: RowMapper<R>,
  ) -> Result<Option<R>>
  where
    R: Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), map)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Gateway impl ────────────────────────────────────────────────────────────

impl Gateway for SqliteStore {
  type Error = Error;

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn create_contact(&self, input: NewContact) -> Result<Contact> {
    let contact = Contact {
      id:             Uuid::new_v4(),
      name:           input.name,
      email:          input.email,
      phone:          input.phone,
      subject:        input.subject,
      message:        input.message,
      preferred_date: input.preferred_date,
      preferred_time: input.preferred_time,
      status:         ContactStatus::default(),
      created_at:     now(),
    };

    let id_str      = encode_uuid(contact.id);
    let name        = contact.name.clone();
    let email       = contact.email.clone();
    let phone       = contact.phone.clone();
    let subject     = contact.subject.clone();
    let message     = contact.message.clone();
    let date_str    = contact.preferred_date.map(encode_dt);
    let time        = contact.preferred_time.clone();
    let status_str  = contact.status.to_string();
    let created_str = encode_dt(contact.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO contacts ({CONTACT_COLUMNS})
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
          rusqlite::params![
            id_str,
            name,
            email,
            phone,
            subject,
            message,
            date_str,
            time,
            status_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %contact.id, "stored contact");
    Ok(contact)
  }

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let raws = self
      .fetch_all(
        format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC, rowid DESC"),
        vec![],
        RawContact::from_row,
      )
      .await?;
    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn update_contact_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> Result<Option<Contact>> {
    let raw = self
      .fetch_optional(
        format!("UPDATE contacts SET status = ?2 WHERE id = ?1 RETURNING {CONTACT_COLUMNS}"),
        vec![encode_uuid(id), status.to_string()],
        RawContact::from_row,
      )
      .await?;
    raw.map(RawContact::into_contact).transpose()
  }

  // ── Newsletter ────────────────────────────────────────────────────────────

  async fn subscribe(&self, input: NewSubscriber) -> Result<Newsletter> {
    // One conditional write: the unique index on `email` decides between
    // the insert and the reactivation branch.
    let raw = self
      .fetch_optional(
        format!(
          "INSERT INTO newsletters (id, email, subscribed_at, is_active)
           VALUES (?1, ?2, ?3, 1)
           ON CONFLICT(email) DO UPDATE
             SET is_active = 1, subscribed_at = excluded.subscribed_at
           RETURNING {NEWSLETTER_COLUMNS}"
        ),
        vec![encode_uuid(Uuid::new_v4()), input.email, encode_dt(now())],
        RawNewsletter::from_row,
      )
      .await?
      .ok_or_else(|| Error::Decode("upsert returned no row".into()))?;
    raw.into_newsletter()
  }

  async fn unsubscribe(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE newsletters SET is_active = 0 WHERE email = ?1",
          rusqlite::params![email],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn create_document(&self, user_id: String, input: NewDocument) -> Result<Document> {
    let doc = Document {
      id:           Uuid::new_v4(),
      user_id,
      name:         input.name,
      doc_type:     input.doc_type,
      object_path:  input.object_path,
      status:       DocumentStatus::default(),
      uploaded_at:  now(),
      reviewed_at:  None,
      review_notes: None,
    };

    let id_str       = encode_uuid(doc.id);
    let user_id      = doc.user_id.clone();
    let name         = doc.name.clone();
    let type_str     = doc.doc_type.to_string();
    let object_path  = doc.object_path.clone();
    let status_str   = doc.status.to_string();
    let uploaded_str = encode_dt(doc.uploaded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (id, user_id, name, type, object_path, status, uploaded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            user_id,
            name,
            type_str,
            object_path,
            status_str,
            uploaded_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %doc.id, "stored document metadata");
    Ok(doc)
  }

  async fn list_documents_by_owner(&self, user_id: &str) -> Result<Vec<Document>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {DOCUMENT_COLUMNS} FROM documents
           WHERE user_id = ?1
           ORDER BY uploaded_at DESC, rowid DESC"
        ),
        vec![user_id.to_owned()],
        RawDocument::from_row,
      )
      .await?;
    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn update_document_status(
    &self,
    id: Uuid,
    status: DocumentStatus,
    review_notes: Option<String>,
  ) -> Result<Option<Document>> {
    let id_str      = encode_uuid(id);
    let status_str  = status.to_string();
    let reviewed_at = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE documents
                 SET status = ?2, review_notes = ?3, reviewed_at = ?4
                 WHERE id = ?1
                 RETURNING {DOCUMENT_COLUMNS}"
              ),
              rusqlite::params![id_str, status_str, review_notes, reviewed_at],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawDocument::into_document).transpose()
  }

  // ── Blog ──────────────────────────────────────────────────────────────────

  async fn create_blog_post(&self, input: NewBlogPost) -> Result<BlogPost> {
    let created_at = now();
    let published_at = match (input.is_published, input.published_at) {
      (_, Some(at)) => Some(at),
      (true, None) => Some(created_at),
      (false, None) => None,
    };

    let post = BlogPost {
      id: Uuid::new_v4(),
      title: input.title,
      slug: input.slug,
      excerpt: input.excerpt,
      content: input.content,
      author: input.author,
      category: input.category,
      image_url: input.image_url,
      is_published: input.is_published,
      published_at,
      created_at,
      updated_at: created_at,
    };

    let id_str        = encode_uuid(post.id);
    let title         = post.title.clone();
    let slug          = post.slug.clone();
    let excerpt       = post.excerpt.clone();
    let content       = post.content.clone();
    let author        = post.author.clone();
    let category      = post.category.clone();
    let image_url     = post.image_url.clone();
    let is_published  = post.is_published;
    let published_str = post.published_at.map(encode_dt);
    let created_str   = encode_dt(post.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("INSERT INTO blog_posts ({BLOG_POST_COLUMNS})
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)"),
          rusqlite::params![
            id_str,
            title,
            slug,
            excerpt,
            content,
            author,
            category,
            image_url,
            is_published,
            published_str,
            created_str,
          ],
        ))
      })
      .await?;

    match outcome {
      Ok(_) => Ok(post),
      Err(e) if is_constraint_violation(&e) => Err(Error::SlugTaken(post.slug)),
      Err(e) => Err(e.into()),
    }
  }

  async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>> {
    let sql = if published_only {
      format!(
        "SELECT {BLOG_POST_COLUMNS} FROM blog_posts
         WHERE is_published = 1
         ORDER BY COALESCE(published_at, created_at) DESC, rowid DESC"
      )
    } else {
      format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC, rowid DESC")
    };
    let raws = self.fetch_all(sql, vec![], RawBlogPost::from_row).await?;
    raws.into_iter().map(RawBlogPost::into_blog_post).collect()
  }

  async fn get_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
    let raw = self
      .fetch_optional(
        format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE slug = ?1"),
        vec![slug.to_owned()],
        RawBlogPost::from_row,
      )
      .await?;
    raw.map(RawBlogPost::into_blog_post).transpose()
  }

  async fn update_blog_post(&self, id: Uuid, patch: BlogPostPatch) -> Result<Option<BlogPost>> {
    let id_str        = encode_uuid(id);
    let set_image     = patch.image_url.is_some();
    let image_url     = patch.image_url.flatten();
    let published_str = patch.published_at.map(encode_dt);
    let updated_str   = encode_dt(now());

    // Columns on the right-hand side of SET read the pre-update row, so a
    // post published for the first time without an explicit date gets
    // `published_at = updated_at`.
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE blog_posts SET
                   title        = COALESCE(?2, title),
                   excerpt      = COALESCE(?3, excerpt),
                   content      = COALESCE(?4, content),
                   author       = COALESCE(?5, author),
                   category     = COALESCE(?6, category),
                   image_url    = CASE WHEN ?7 THEN ?8 ELSE image_url END,
                   is_published = COALESCE(?9, is_published),
                   published_at = COALESCE(
                     ?10,
                     published_at,
                     CASE WHEN COALESCE(?9, is_published) THEN ?11 END
                   ),
                   updated_at   = ?11
                 WHERE id = ?1
                 RETURNING {BLOG_POST_COLUMNS}"
              ),
              rusqlite::params![
                id_str,
                patch.title,
                patch.excerpt,
                patch.content,
                patch.author,
                patch.category,
                set_image,
                image_url,
                patch.is_published,
                published_str,
                updated_str,
              ],
              RawBlogPost::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawBlogPost::into_blog_post).transpose()
  }

  // ── Whitepapers ───────────────────────────────────────────────────────────

  async fn create_whitepaper(&self, input: NewWhitepaper) -> Result<Whitepaper> {
    let paper = Whitepaper {
      id:             Uuid::new_v4(),
      title:          input.title,
      description:    input.description,
      author:         input.author,
      file_url:       input.file_url,
      download_count: 0,
      is_published:   input.is_published,
      created_at:     now(),
    };

    let id_str       = encode_uuid(paper.id);
    let title        = paper.title.clone();
    let description  = paper.description.clone();
    let author       = paper.author.clone();
    let file_url     = paper.file_url.clone();
    let is_published = paper.is_published;
    let created_str  = encode_dt(paper.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO whitepapers
             (id, title, description, author, file_url, download_count, is_published, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
          rusqlite::params![
            id_str,
            title,
            description,
            author,
            file_url,
            is_published,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(paper)
  }

  async fn list_whitepapers(&self, published_only: bool) -> Result<Vec<Whitepaper>> {
    let filter = if published_only { "WHERE is_published = 1" } else { "" };
    let raws = self
      .fetch_all(
        format!(
          "SELECT {WHITEPAPER_COLUMNS} FROM whitepapers {filter}
           ORDER BY created_at DESC, rowid DESC"
        ),
        vec![],
        RawWhitepaper::from_row,
      )
      .await?;
    raws.into_iter().map(RawWhitepaper::into_whitepaper).collect()
  }

  async fn increment_download(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE whitepapers SET download_count = download_count + 1 WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  async fn create_appointment(&self, input: NewAppointment) -> Result<Appointment> {
    let appt = Appointment {
      id:             Uuid::new_v4(),
      name:           input.name,
      email:          input.email,
      phone:          input.phone,
      preferred_date: input.preferred_date,
      preferred_time: input.preferred_time,
      service_type:   input.service_type,
      message:        input.message,
      status:         AppointmentStatus::default(),
      created_at:     now(),
    };

    let id_str       = encode_uuid(appt.id);
    let name         = appt.name.clone();
    let email        = appt.email.clone();
    let phone        = appt.phone.clone();
    let date_str     = encode_dt(appt.preferred_date);
    let time         = appt.preferred_time.clone();
    let service_type = appt.service_type.clone();
    let message      = appt.message.clone();
    let status_str   = appt.status.to_string();
    let created_str  = encode_dt(appt.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO appointments ({APPOINTMENT_COLUMNS})
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
          rusqlite::params![
            id_str,
            name,
            email,
            phone,
            date_str,
            time,
            service_type,
            message,
            status_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %appt.id, "stored appointment");
    Ok(appt)
  }

  async fn list_appointments(&self) -> Result<Vec<Appointment>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY created_at DESC, rowid DESC"
        ),
        vec![],
        RawAppointment::from_row,
      )
      .await?;
    raws.into_iter().map(RawAppointment::into_appointment).collect()
  }

  async fn update_appointment_status(
    &self,
    id: Uuid,
    status: AppointmentStatus,
  ) -> Result<Option<Appointment>> {
    let raw = self
      .fetch_optional(
        format!(
          "UPDATE appointments SET status = ?2 WHERE id = ?1 RETURNING {APPOINTMENT_COLUMNS}"
        ),
        vec![encode_uuid(id), status.to_string()],
        RawAppointment::from_row,
      )
      .await?;
    raw.map(RawAppointment::into_appointment).transpose()
  }
}
