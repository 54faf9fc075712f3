//! JSON REST API for the Meridian site and client portal.
//!
//! Exposes an axum [`Router`] backed by any [`Gateway`] and
//! [`ObjectStorage`]. Each handler validates its input, makes exactly one
//! gateway call, and shapes the result. TLS and session management are the
//! caller's responsibility; the caller identity arrives through an
//! [`IdentityResolver`].
//!
//! # Routes
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | `POST` | `/api/contacts` | none |
//! | `POST` | `/api/newsletter/subscribe` | none |
//! | `POST` | `/api/newsletter/unsubscribe` | none |
//! | `POST` | `/api/appointments` | none |
//! | `GET`  | `/api/blog` | none |
//! | `GET`  | `/api/blog/{slug}` | none |
//! | `GET`  | `/api/whitepapers` | none |
//! | `POST` | `/api/whitepapers/{id}/download` | none |
//! | `GET`  | `/api/login`, `/api/logout` | none |
//! | `GET`  | `/api/auth/user` | caller |
//! | `GET`/`POST` | `/api/documents` | caller |
//! | `POST` | `/api/uploads` | caller |
//! | various | `/api/admin/…` | admin |

pub mod admin;
pub mod appointments;
pub mod auth;
pub mod blog;
pub mod body;
pub mod contacts;
pub mod documents;
pub mod error;
pub mod newsletter;
pub mod objects;
pub mod session;
pub mod whitepapers;

use std::{collections::HashSet, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, patch, post},
};
use meridian_core::{objects::ObjectStorage, store::Gateway};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use auth::{HeaderIdentity, IdentityConfig, IdentityResolver};
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Settings the handlers consult at request time.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub identity:         IdentityConfig,
  /// Caller ids permitted on `/api/admin/…`.
  pub admin_user_ids:   HashSet<String>,
  pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      identity:         IdentityConfig::default(),
      admin_user_ids:   HashSet::new(),
      max_upload_bytes: 10 * 1024 * 1024,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// Nothing in here is mutated by a request; the gateway owns all state.
pub struct AppState<G, O> {
  pub gateway:  Arc<G>,
  pub objects:  Arc<O>,
  pub identity: Arc<dyn IdentityResolver>,
  pub config:   Arc<ApiConfig>,
}

impl<G, O> Clone for AppState<G, O> {
  fn clone(&self) -> Self {
    Self {
      gateway:  Arc::clone(&self.gateway),
      objects:  Arc::clone(&self.objects),
      identity: Arc::clone(&self.identity),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router, with every route under `/api`.
pub fn router<G, O>(state: AppState<G, O>) -> Router
where
  G: Gateway + 'static,
  O: ObjectStorage + 'static,
{
  let upload_limit = state.config.max_upload_bytes;

  let api = Router::new()
    // Public forms
    .route("/contacts", post(contacts::create::<G, O>))
    .route("/newsletter/subscribe", post(newsletter::subscribe::<G, O>))
    .route("/newsletter/unsubscribe", post(newsletter::unsubscribe::<G, O>))
    .route("/appointments", post(appointments::create::<G, O>))
    // Public content
    .route("/blog", get(blog::list::<G, O>))
    .route("/blog/{slug}", get(blog::get_by_slug::<G, O>))
    .route("/whitepapers", get(whitepapers::list::<G, O>))
    .route("/whitepapers/{id}/download", post(whitepapers::download::<G, O>))
    // Session
    .route("/login", get(session::login::<G, O>))
    .route("/logout", get(session::logout::<G, O>))
    .route("/auth/user", get(session::current_user))
    // Client portal
    .route("/documents", get(documents::list::<G, O>).post(documents::create::<G, O>))
    .route(
      "/uploads",
      post(documents::upload::<G, O>).layer(DefaultBodyLimit::max(upload_limit)),
    )
    // Back office
    .route("/admin/contacts", get(admin::list_contacts::<G, O>))
    .route("/admin/contacts/{id}/status", patch(admin::contact_status::<G, O>))
    .route("/admin/appointments", get(admin::list_appointments::<G, O>))
    .route("/admin/appointments/{id}/status", patch(admin::appointment_status::<G, O>))
    .route("/admin/documents/{id}/status", patch(admin::document_status::<G, O>))
    .route(
      "/admin/blog",
      get(admin::list_blog_posts::<G, O>).post(admin::create_blog_post::<G, O>),
    )
    .route("/admin/blog/{id}", patch(admin::update_blog_post::<G, O>))
    .route(
      "/admin/whitepapers",
      get(admin::list_whitepapers::<G, O>).post(admin::create_whitepaper::<G, O>),
    );

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Parse an id taken from a URL path. A malformed id names no row, so it is
/// reported the same way as a missing one.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{kind} {raw} not found")))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
