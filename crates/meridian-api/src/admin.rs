//! Back-office handlers under `/api/admin`. Every route requires an [`Admin`]
//! caller.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/admin/contacts` | All submissions, newest first |
//! | `PATCH` | `/admin/contacts/{id}/status` | Body: `{"status"}` |
//! | `GET`   | `/admin/appointments` | All bookings, newest first |
//! | `PATCH` | `/admin/appointments/{id}/status` | Body: `{"status"}` |
//! | `PATCH` | `/admin/documents/{id}/status` | Body: `{"status","reviewNotes"?}` |
//! | `GET`   | `/admin/blog` | Drafts included |
//! | `POST`  | `/admin/blog` | 201; 409 on a duplicate slug |
//! | `PATCH` | `/admin/blog/{id}` | Partial edit; the slug cannot change |
//! | `GET`   | `/admin/whitepapers` | Drafts included |
//! | `POST`  | `/admin/whitepapers` | 201 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use meridian_core::{
  appointment::Appointment,
  blog::{BlogPost, BlogPostPatch, NewBlogPost},
  contact::Contact,
  document::Document,
  objects::ObjectStorage,
  status::{AppointmentStatus, ContactStatus, DocumentStatus, StatusUpdate},
  store::Gateway,
  validate::Validate as _,
  whitepaper::{NewWhitepaper, Whitepaper},
};

use crate::{AppState, auth::Admin, body::RawJson, error::ApiError, parse_id};

// ─── Contacts ─────────────────────────────────────────────────────────────────

/// `GET /api/admin/contacts`
pub async fn list_contacts<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let contacts = state.gateway.list_contacts().await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

/// `PATCH /api/admin/contacts/{id}/status`
pub async fn contact_status<G, O>(
  State(state): State<AppState<G, O>>,
  Admin(admin): Admin,
  Path(id): Path<String>,
  RawJson(raw): RawJson,
) -> Result<Json<Contact>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let id = parse_id("contact", &id)?;
  let update = StatusUpdate::<ContactStatus>::validate(&raw)?;
  let contact = state
    .gateway
    .update_contact_status(id, update.status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  tracing::info!(%id, status = %contact.status, by = %admin.id, "contact status changed");
  Ok(Json(contact))
}

// ─── Appointments ─────────────────────────────────────────────────────────────

/// `GET /api/admin/appointments`
pub async fn list_appointments<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
) -> Result<Json<Vec<Appointment>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let appts = state.gateway.list_appointments().await.map_err(ApiError::store)?;
  Ok(Json(appts))
}

/// `PATCH /api/admin/appointments/{id}/status`
pub async fn appointment_status<G, O>(
  State(state): State<AppState<G, O>>,
  Admin(admin): Admin,
  Path(id): Path<String>,
  RawJson(raw): RawJson,
) -> Result<Json<Appointment>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let id = parse_id("appointment", &id)?;
  let update = StatusUpdate::<AppointmentStatus>::validate(&raw)?;
  let appt = state
    .gateway
    .update_appointment_status(id, update.status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("appointment {id} not found")))?;
  tracing::info!(%id, status = %appt.status, by = %admin.id, "appointment status changed");
  Ok(Json(appt))
}

// ─── Documents ────────────────────────────────────────────────────────────────

/// `PATCH /api/admin/documents/{id}/status`
pub async fn document_status<G, O>(
  State(state): State<AppState<G, O>>,
  Admin(admin): Admin,
  Path(id): Path<String>,
  RawJson(raw): RawJson,
) -> Result<Json<Document>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let id = parse_id("document", &id)?;
  let update = StatusUpdate::<DocumentStatus>::validate(&raw)?;
  let doc = state
    .gateway
    .update_document_status(id, update.status, update.review_notes)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  tracing::info!(%id, status = %doc.status, by = %admin.id, "document reviewed");
  Ok(Json(doc))
}

// ─── Blog ─────────────────────────────────────────────────────────────────────

/// `GET /api/admin/blog`: drafts included, newest first.
pub async fn list_blog_posts<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
) -> Result<Json<Vec<BlogPost>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let posts = state.gateway.list_blog_posts(false).await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `POST /api/admin/blog`
pub async fn create_blog_post<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewBlogPost::validate(&raw)?;
  let post = state.gateway.create_blog_post(input).await.map_err(ApiError::store)?;
  tracing::info!(id = %post.id, slug = %post.slug, "blog post created");
  Ok((StatusCode::CREATED, Json(post)))
}

/// `PATCH /api/admin/blog/{id}`
pub async fn update_blog_post<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
  Path(id): Path<String>,
  RawJson(raw): RawJson,
) -> Result<Json<BlogPost>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let id = parse_id("blog post", &id)?;
  let patch = BlogPostPatch::validate(&raw)?;
  let post = state
    .gateway
    .update_blog_post(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("blog post {id} not found")))?;
  Ok(Json(post))
}

// ─── Whitepapers ──────────────────────────────────────────────────────────────

/// `GET /api/admin/whitepapers`: drafts included.
pub async fn list_whitepapers<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
) -> Result<Json<Vec<Whitepaper>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let papers = state.gateway.list_whitepapers(false).await.map_err(ApiError::store)?;
  Ok(Json(papers))
}

/// `POST /api/admin/whitepapers`
pub async fn create_whitepaper<G, O>(
  State(state): State<AppState<G, O>>,
  _: Admin,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewWhitepaper::validate(&raw)?;
  let paper = state.gateway.create_whitepaper(input).await.map_err(ApiError::store)?;
  tracing::info!(id = %paper.id, "whitepaper created");
  Ok((StatusCode::CREATED, Json(paper)))
}
