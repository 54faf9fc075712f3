//! Typed queries and mutations over [`QueryCache`] and [`MutationTracker`].
//!
//! Each mutation helper declares, through [`Mutation::invalidates`], which
//! cache entries its success makes stale.
//!
//! | Mutation | Invalidates |
//! |----------|-------------|
//! | upload document | `Documents(user)` |
//! | record whitepaper download | `Whitepapers` |
//! | create / edit blog post | `BlogPosts`, `BlogPost(slug)` |
//! | create whitepaper | `Whitepapers` |
//! | review document | `Documents(owner)` |
//! | contact status change | `AdminContacts` |
//! | appointment status change | `AdminAppointments` |
//! | contact, appointment, newsletter | nothing |

use meridian_core::{
  CallerIdentity,
  appointment::{Appointment, NewAppointment},
  blog::{BlogPost, BlogPostPatch, NewBlogPost},
  contact::{Contact, NewContact},
  document::{Document, DocumentType, NewDocument},
  newsletter::Newsletter,
  status::{AppointmentStatus, ContactStatus, DocumentStatus},
  whitepaper::{NewWhitepaper, Whitepaper},
};
use uuid::Uuid;

use crate::{
  cache::{CacheKey, QueryCache, QueryState},
  client::ApiClient,
  mutation::{MutationState, MutationTracker},
};

// ─── Invalidation map ─────────────────────────────────────────────────────────

/// The mutations the site performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<'a> {
  UploadDocument { user_id: &'a str },
  RecordDownload,
  SaveBlogPost { slug: &'a str },
  SaveWhitepaper,
  ReviewDocument { user_id: &'a str },
  SetContactStatus,
  SetAppointmentStatus,
  SubmitContact,
  BookAppointment,
  Subscribe,
  Unsubscribe,
}

impl Mutation<'_> {
  /// Cache entries made stale by this mutation succeeding.
  pub fn invalidates(&self) -> Vec<CacheKey> {
    match self {
      Mutation::UploadDocument { user_id } => vec![CacheKey::Documents((*user_id).to_owned())],
      Mutation::RecordDownload => vec![CacheKey::Whitepapers],
      Mutation::SaveBlogPost { slug } => {
        vec![CacheKey::BlogPosts, CacheKey::BlogPost((*slug).to_owned())]
      }
      Mutation::SaveWhitepaper => vec![CacheKey::Whitepapers],
      Mutation::ReviewDocument { user_id } => vec![CacheKey::Documents((*user_id).to_owned())],
      Mutation::SetContactStatus => vec![CacheKey::AdminContacts],
      Mutation::SetAppointmentStatus => vec![CacheKey::AdminAppointments],
      Mutation::SubmitContact
      | Mutation::BookAppointment
      | Mutation::Subscribe
      | Mutation::Unsubscribe => Vec::new(),
    }
  }
}

// ─── Queries ──────────────────────────────────────────────────────────────────

pub async fn blog_posts(
  cache: &QueryCache,
  client: &ApiClient,
) -> QueryState<Vec<BlogPost>> {
  cache.fetch(CacheKey::BlogPosts, || client.list_blog_posts()).await
}

pub async fn blog_post(
  cache: &QueryCache,
  client: &ApiClient,
  slug: &str,
) -> QueryState<BlogPost> {
  cache.fetch(CacheKey::BlogPost(slug.to_owned()), || client.get_blog_post(slug)).await
}

pub async fn whitepapers(
  cache: &QueryCache,
  client: &ApiClient,
) -> QueryState<Vec<Whitepaper>> {
  cache.fetch(CacheKey::Whitepapers, || client.list_whitepapers()).await
}

pub async fn current_user(cache: &QueryCache, client: &ApiClient) -> QueryState<CallerIdentity> {
  cache.fetch(CacheKey::CurrentUser, || client.current_user()).await
}

/// The signed-in user's documents.
///
/// Keyed by user id. When the client forwards no identity of its own, the id
/// comes from the server's view of the session.
pub async fn documents(cache: &QueryCache, client: &ApiClient) -> QueryState<Vec<Document>> {
  let user_id = match client.identity() {
    Some(identity) => identity.id.clone(),
    None => match current_user(cache, client).await {
      QueryState::Success(user) => user.id.clone(),
      QueryState::Error(e) => return QueryState::Error(e),
      QueryState::Idle | QueryState::Loading => return QueryState::Loading,
    },
  };
  cache.fetch(CacheKey::Documents(user_id), || client.list_documents()).await
}

pub async fn admin_contacts(cache: &QueryCache, client: &ApiClient) -> QueryState<Vec<Contact>> {
  cache.fetch(CacheKey::AdminContacts, || client.admin_contacts()).await
}

pub async fn admin_appointments(
  cache: &QueryCache,
  client: &ApiClient,
) -> QueryState<Vec<Appointment>> {
  cache.fetch(CacheKey::AdminAppointments, || client.admin_appointments()).await
}

// ─── Mutations ────────────────────────────────────────────────────────────────

/// Store `bytes`, then register them as a document owned by the caller.
pub async fn upload_document<'t>(
  tracker: &'t mut MutationTracker<Document>,
  cache: &QueryCache,
  client: &ApiClient,
  name: &str,
  doc_type: DocumentType,
  bytes: Vec<u8>,
  content_type: &str,
) -> &'t MutationState<Document> {
  let fut = async {
    let object_path = client.upload(bytes, content_type).await?;
    let input = NewDocument { name: name.to_owned(), doc_type, object_path };
    client.create_document(&input).await
  };
  tracker
    .submit(
      cache,
      |doc| Mutation::UploadDocument { user_id: &doc.user_id }.invalidates(),
      fut,
    )
    .await
}

pub async fn record_download<'t>(
  tracker: &'t mut MutationTracker<()>,
  cache: &QueryCache,
  client: &ApiClient,
  whitepaper_id: Uuid,
) -> &'t MutationState<()> {
  tracker
    .submit(
      cache,
      |_| Mutation::RecordDownload.invalidates(),
      client.record_download(whitepaper_id),
    )
    .await
}

pub async fn create_blog_post<'t>(
  tracker: &'t mut MutationTracker<BlogPost>,
  cache: &QueryCache,
  client: &ApiClient,
  input: &NewBlogPost,
) -> &'t MutationState<BlogPost> {
  tracker
    .submit(
      cache,
      |post| Mutation::SaveBlogPost { slug: &post.slug }.invalidates(),
      client.create_blog_post(input),
    )
    .await
}

pub async fn update_blog_post<'t>(
  tracker: &'t mut MutationTracker<BlogPost>,
  cache: &QueryCache,
  client: &ApiClient,
  id: Uuid,
  patch: &BlogPostPatch,
) -> &'t MutationState<BlogPost> {
  tracker
    .submit(
      cache,
      |post| Mutation::SaveBlogPost { slug: &post.slug }.invalidates(),
      client.update_blog_post(id, patch),
    )
    .await
}

pub async fn create_whitepaper<'t>(
  tracker: &'t mut MutationTracker<Whitepaper>,
  cache: &QueryCache,
  client: &ApiClient,
  input: &NewWhitepaper,
) -> &'t MutationState<Whitepaper> {
  tracker
    .submit(
      cache,
      |_| Mutation::SaveWhitepaper.invalidates(),
      client.create_whitepaper(input),
    )
    .await
}

/// Approve or reject a document; the owner's list is taken from the
/// returned row.
pub async fn review_document<'t>(
  tracker: &'t mut MutationTracker<Document>,
  cache: &QueryCache,
  client: &ApiClient,
  id: Uuid,
  status: DocumentStatus,
  review_notes: Option<&str>,
) -> &'t MutationState<Document> {
  tracker
    .submit(
      cache,
      |doc| Mutation::ReviewDocument { user_id: &doc.user_id }.invalidates(),
      client.review_document(id, status, review_notes),
    )
    .await
}

pub async fn set_contact_status<'t>(
  tracker: &'t mut MutationTracker<Contact>,
  cache: &QueryCache,
  client: &ApiClient,
  id: Uuid,
  status: ContactStatus,
) -> &'t MutationState<Contact> {
  tracker
    .submit(
      cache,
      |_| Mutation::SetContactStatus.invalidates(),
      client.set_contact_status(id, status),
    )
    .await
}

pub async fn set_appointment_status<'t>(
  tracker: &'t mut MutationTracker<Appointment>,
  cache: &QueryCache,
  client: &ApiClient,
  id: Uuid,
  status: AppointmentStatus,
) -> &'t MutationState<Appointment> {
  tracker
    .submit(
      cache,
      |_| Mutation::SetAppointmentStatus.invalidates(),
      client.set_appointment_status(id, status),
    )
    .await
}

pub async fn submit_contact<'t>(
  tracker: &'t mut MutationTracker<Contact>,
  cache: &QueryCache,
  client: &ApiClient,
  input: &NewContact,
) -> &'t MutationState<Contact> {
  tracker
    .submit(
      cache,
      |_| Mutation::SubmitContact.invalidates(),
      client.submit_contact(input),
    )
    .await
}

pub async fn book_appointment<'t>(
  tracker: &'t mut MutationTracker<Appointment>,
  cache: &QueryCache,
  client: &ApiClient,
  input: &NewAppointment,
) -> &'t MutationState<Appointment> {
  tracker
    .submit(
      cache,
      |_| Mutation::BookAppointment.invalidates(),
      client.book_appointment(input),
    )
    .await
}

pub async fn subscribe<'t>(
  tracker: &'t mut MutationTracker<Newsletter>,
  cache: &QueryCache,
  client: &ApiClient,
  email: &str,
) -> &'t MutationState<Newsletter> {
  tracker
    .submit(cache, |_| Mutation::Subscribe.invalidates(), client.subscribe(email))
    .await
}

pub async fn unsubscribe<'t>(
  tracker: &'t mut MutationTracker<()>,
  cache: &QueryCache,
  client: &ApiClient,
  email: &str,
) -> &'t MutationState<()> {
  tracker
    .submit(cache, |_| Mutation::Unsubscribe.invalidates(), client.unsubscribe(email))
    .await
}
