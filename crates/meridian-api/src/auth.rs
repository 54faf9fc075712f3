//! Caller identity resolution and the extractors that enforce it.
//!
//! Authentication itself happens upstream, in an external identity provider
//! that sits in front of this service and forwards the resolved user as
//! trusted request headers. This module only reads those headers back.

use std::collections::HashSet;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, HeaderName, header::InvalidHeaderName, request::Parts},
};
use meridian_core::{CallerIdentity, objects::ObjectStorage, store::Gateway};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── Resolver ─────────────────────────────────────────────────────────────────

/// Turns request headers into a caller identity, or `None` when the request
/// is anonymous.
pub trait IdentityResolver: Send + Sync {
  fn resolve(&self, headers: &HeaderMap) -> Option<CallerIdentity>;
}

/// Identity provider settings, deserialised from the `[identity]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
  #[serde(default = "default_user_id_header")]
  pub user_id_header: String,
  #[serde(default = "default_email_header")]
  pub email_header:   String,
  #[serde(default = "default_name_header")]
  pub name_header:    String,
  #[serde(default = "default_avatar_header")]
  pub avatar_header:  String,
  /// Where `GET /api/login` sends the browser.
  #[serde(default = "default_login_url")]
  pub login_url:      String,
  /// Where `GET /api/logout` sends the browser.
  #[serde(default = "default_logout_url")]
  pub logout_url:     String,
}

fn default_user_id_header() -> String { "x-auth-user-id".into() }
fn default_email_header() -> String { "x-auth-user-email".into() }
fn default_name_header() -> String { "x-auth-user-name".into() }
fn default_avatar_header() -> String { "x-auth-user-avatar".into() }
fn default_login_url() -> String { "/auth/login".into() }
fn default_logout_url() -> String { "/auth/logout".into() }

impl Default for IdentityConfig {
  fn default() -> Self {
    Self {
      user_id_header: default_user_id_header(),
      email_header:   default_email_header(),
      name_header:    default_name_header(),
      avatar_header:  default_avatar_header(),
      login_url:      default_login_url(),
      logout_url:     default_logout_url(),
    }
  }
}

/// Reads the identity from headers set by a trusted fronting proxy.
///
/// The proxy must strip these headers from inbound client traffic.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
  user_id: HeaderName,
  email:   HeaderName,
  name:    HeaderName,
  avatar:  HeaderName,
}

impl HeaderIdentity {
  pub fn from_config(config: &IdentityConfig) -> Result<Self, InvalidHeaderName> {
    Ok(Self {
      user_id: HeaderName::try_from(config.user_id_header.as_str())?,
      email:   HeaderName::try_from(config.email_header.as_str())?,
      name:    HeaderName::try_from(config.name_header.as_str())?,
      avatar:  HeaderName::try_from(config.avatar_header.as_str())?,
    })
  }
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
}

impl IdentityResolver for HeaderIdentity {
  fn resolve(&self, headers: &HeaderMap) -> Option<CallerIdentity> {
    Some(CallerIdentity {
      id:           header_text(headers, &self.user_id)?,
      email:        header_text(headers, &self.email),
      display_name: header_text(headers, &self.name),
      avatar_url:   header_text(headers, &self.avatar),
    })
  }
}

// ─── Extractors ───────────────────────────────────────────────────────────────

/// An authenticated caller. Rejects with 401 when no identity resolves.
pub struct Caller(pub CallerIdentity);

impl<G, O> FromRequestParts<AppState<G, O>> for Caller
where
  G: Gateway + 'static,
  O: ObjectStorage + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<G, O>,
  ) -> Result<Self, Self::Rejection> {
    state
      .identity
      .resolve(&parts.headers)
      .map(Caller)
      .ok_or(ApiError::Unauthorized)
  }
}

/// An authenticated caller listed in `admin_user_ids`. Rejects with 401 when
/// anonymous and 403 when not an administrator.
pub struct Admin(pub CallerIdentity);

impl<G, O> FromRequestParts<AppState<G, O>> for Admin
where
  G: Gateway + 'static,
  O: ObjectStorage + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<G, O>,
  ) -> Result<Self, Self::Rejection> {
    let Caller(identity) = Caller::from_request_parts(parts, state).await?;
    if is_admin(&state.config.admin_user_ids, &identity) {
      Ok(Admin(identity))
    } else {
      tracing::warn!(user = %identity.id, "non-admin caller on admin route");
      Err(ApiError::Forbidden)
    }
  }
}

fn is_admin(admins: &HashSet<String>, identity: &CallerIdentity) -> bool {
  admins.contains(&identity.id)
}
