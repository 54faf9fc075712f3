//! Request body extractors that fail with [`ApiError`] instead of axum's
//! plain-text rejections.

use axum::{
  Json,
  extract::{FromRequest, Request},
};
use meridian_core::ValidationError;
use serde_json::Value;

use crate::error::ApiError;

/// An untyped JSON payload, handed to a [`Validate`](meridian_core::Validate)
/// implementation by the handler.
pub struct RawJson(pub Value);

impl<S> FromRequest<S> for RawJson
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<Value>::from_request(req, state)
      .await
      .map_err(|rejection| ValidationError::new("body", rejection.body_text()))?;
    Ok(Self(value))
  }
}
