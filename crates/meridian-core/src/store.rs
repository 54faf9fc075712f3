//! The `Gateway` trait: every read and write against persistent storage.
//!
//! The trait is implemented by storage backends (e.g. `meridian-store-sqlite`).
//! Request handlers depend on this abstraction, not on any concrete backend.
//!
//! Each method touches exactly one entity, and each write touches exactly one
//! row. Every list is ordered most recent first. Id-keyed reads and updates
//! return `None` (or `false`) for a missing row rather than an error; errors
//! are reserved for storage failures.

use std::future::Future;

use uuid::Uuid;

use crate::{
  appointment::{Appointment, NewAppointment},
  blog::{BlogPost, BlogPostPatch, NewBlogPost},
  contact::{Contact, NewContact},
  document::{Document, NewDocument},
  newsletter::{NewSubscriber, Newsletter},
  status::{AppointmentStatus, ContactStatus, DocumentStatus},
  whitepaper::{NewWhitepaper, Whitepaper},
};

/// Failure reported by a [`Gateway`].
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// Whether the write was refused by a uniqueness constraint (e.g. a
  /// duplicate blog slug), as opposed to a storage failure.
  fn is_conflict(&self) -> bool { false }
}

/// Abstraction over a relational storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Gateway: Send + Sync {
  type Error: StoreError;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Persist a contact-form submission with status `new`.
  fn create_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn list_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn update_contact_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  // ── Newsletter ────────────────────────────────────────────────────────

  /// Insert a subscription, or reactivate the existing row for this email
  /// and refresh its `subscribed_at`.
  fn subscribe(
    &self,
    input: NewSubscriber,
  ) -> impl Future<Output = Result<Newsletter, Self::Error>> + Send + '_;

  /// Mark the subscription inactive. Returns `false` if no row matched.
  fn unsubscribe<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Persist document metadata owned by `user_id`, with status `pending`.
  fn create_document(
    &self,
    user_id: String,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// Documents owned by `user_id` only, newest upload first.
  fn list_documents_by_owner<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Set the review status and notes, stamping `reviewed_at`.
  fn update_document_status(
    &self,
    id: Uuid,
    status: DocumentStatus,
    review_notes: Option<String>,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  // ── Blog ──────────────────────────────────────────────────────────────

  fn create_blog_post(
    &self,
    input: NewBlogPost,
  ) -> impl Future<Output = Result<BlogPost, Self::Error>> + Send + '_;

  /// With `published_only`, newest `published_at` first; otherwise every
  /// post, newest `created_at` first.
  fn list_blog_posts(
    &self,
    published_only: bool,
  ) -> impl Future<Output = Result<Vec<BlogPost>, Self::Error>> + Send + '_;

  fn get_blog_post_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<BlogPost>, Self::Error>> + Send + 'a;

  /// Apply `patch` and refresh `updated_at`. The slug is never touched.
  fn update_blog_post(
    &self,
    id: Uuid,
    patch: BlogPostPatch,
  ) -> impl Future<Output = Result<Option<BlogPost>, Self::Error>> + Send + '_;

  // ── Whitepapers ───────────────────────────────────────────────────────

  fn create_whitepaper(
    &self,
    input: NewWhitepaper,
  ) -> impl Future<Output = Result<Whitepaper, Self::Error>> + Send + '_;

  fn list_whitepapers(
    &self,
    published_only: bool,
  ) -> impl Future<Output = Result<Vec<Whitepaper>, Self::Error>> + Send + '_;

  /// Add one to `download_count` in a single statement. Returns `false` if
  /// the whitepaper does not exist.
  fn increment_download(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Appointments ──────────────────────────────────────────────────────

  fn create_appointment(
    &self,
    input: NewAppointment,
  ) -> impl Future<Output = Result<Appointment, Self::Error>> + Send + '_;

  fn list_appointments(
    &self,
  ) -> impl Future<Output = Result<Vec<Appointment>, Self::Error>> + Send + '_;

  fn update_appointment_status(
    &self,
    id: Uuid,
    status: AppointmentStatus,
  ) -> impl Future<Output = Result<Option<Appointment>, Self::Error>> + Send + '_;
}
