//! Handlers for the client-portal document endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/documents` | The caller's own documents, newest first |
//! | `POST` | `/documents` | Body: `{"name","type","objectPath"}`; 201 + document |
//! | `POST` | `/uploads` | Raw bytes; 201 + `{"objectPath"}` |
//!
//! Uploading is two requests: the bytes go to object storage first, then the
//! returned path is registered as a document. If the second request never
//! arrives the object is orphaned; nothing reclaims it.
//!
//! The owner of a document is always the resolved caller. A `userId` in the
//! request body is ignored.

use axum::{
  Json,
  extract::{State, rejection::BytesRejection},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use meridian_core::{
  ValidationError,
  document::{Document, NewDocument},
  objects::ObjectStorage,
  store::Gateway,
  validate::Validate as _,
};
use serde::Serialize;

use crate::{AppState, auth::Caller, body::RawJson, error::ApiError};

/// `GET /api/documents`
pub async fn list<G, O>(
  State(state): State<AppState<G, O>>,
  Caller(caller): Caller,
) -> Result<Json<Vec<Document>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let docs = state
    .gateway
    .list_documents_by_owner(&caller.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(docs))
}

/// `POST /api/documents`
pub async fn create<G, O>(
  State(state): State<AppState<G, O>>,
  Caller(caller): Caller,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewDocument::validate(&raw)?;
  let doc = state
    .gateway
    .create_document(caller.id, input)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %doc.id, doc_type = %doc.doc_type, "document registered");
  Ok((StatusCode::CREATED, Json(doc)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
  pub object_path: String,
}

/// `POST /api/uploads`: store the request body and return its object path.
pub async fn upload<G, O>(
  State(state): State<AppState<G, O>>,
  Caller(caller): Caller,
  headers: HeaderMap,
  body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let bytes = body.map_err(|rejection| {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
      ApiError::PayloadTooLarge
    } else {
      ApiError::Validation(ValidationError::new("body", rejection.body_text()))
    }
  })?;
  if bytes.is_empty() {
    return Err(ValidationError::new("body", "must not be empty").into());
  }

  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned);
  let size = bytes.len();

  let object_path = state
    .objects
    .put(bytes, content_type)
    .await
    .map_err(|e| ApiError::Objects(Box::new(e)))?;

  tracing::info!(user = %caller.id, size, path = %object_path, "object uploaded");
  Ok((StatusCode::CREATED, Json(UploadResponse { object_path })))
}
