//! Handler for `POST /api/contacts`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use meridian_core::{
  contact::NewContact,
  objects::ObjectStorage,
  store::Gateway,
  validate::Validate as _,
};

use crate::{AppState, body::RawJson, error::ApiError};

/// `POST /api/contacts`: returns 201 + the stored contact with status `new`.
pub async fn create<G, O>(
  State(state): State<AppState<G, O>>,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewContact::validate(&raw)?;
  let contact = state.gateway.create_contact(input).await.map_err(ApiError::store)?;
  tracing::info!(id = %contact.id, "contact form submitted");
  Ok((StatusCode::CREATED, Json(contact)))
}
