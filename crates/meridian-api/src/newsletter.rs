//! Handlers for `/api/newsletter` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/newsletter/subscribe` | Body: `{"email":"..."}`; 201 on every call |
//! | `POST` | `/newsletter/unsubscribe` | Body: `{"email":"..."}`; 200 even if unknown |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use meridian_core::{
  newsletter::NewSubscriber,
  objects::ObjectStorage,
  store::Gateway,
  validate::Validate as _,
};
use serde_json::json;

use crate::{AppState, body::RawJson, error::ApiError};

/// `POST /api/newsletter/subscribe`
///
/// Re-subscribing an existing address reactivates the same row.
pub async fn subscribe<G, O>(
  State(state): State<AppState<G, O>>,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewSubscriber::validate(&raw)?;
  let subscription = state.gateway.subscribe(input).await.map_err(ApiError::store)?;
  tracing::info!(id = %subscription.id, "newsletter subscription active");
  Ok((StatusCode::CREATED, Json(subscription)))
}

/// `POST /api/newsletter/unsubscribe`
pub async fn unsubscribe<G, O>(
  State(state): State<AppState<G, O>>,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewSubscriber::validate(&raw)?;
  let matched = state
    .gateway
    .unsubscribe(&input.email)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(matched, "newsletter unsubscribe");
  Ok(Json(json!({ "message": "Successfully unsubscribed" })))
}
