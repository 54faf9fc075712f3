//! Handlers for the public `/api/whitepapers` endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use meridian_core::{objects::ObjectStorage, store::Gateway, whitepaper::Whitepaper};
use serde_json::{Value, json};

use crate::{AppState, error::ApiError, parse_id};

/// `GET /api/whitepapers`: published reports only, newest first.
pub async fn list<G, O>(
  State(state): State<AppState<G, O>>,
) -> Result<Json<Vec<Whitepaper>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let papers = state.gateway.list_whitepapers(true).await.map_err(ApiError::store)?;
  Ok(Json(papers))
}

/// `POST /api/whitepapers/{id}/download`: bumps the download counter.
///
/// An unknown id answers 404.
pub async fn download<G, O>(
  State(state): State<AppState<G, O>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let id = parse_id("whitepaper", &id)?;
  let found = state.gateway.increment_download(id).await.map_err(ApiError::store)?;
  if !found {
    return Err(ApiError::NotFound(format!("whitepaper {id} not found")));
  }
  Ok(Json(json!({ "message": "Download recorded" })))
}
