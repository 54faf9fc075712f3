//! Handler for `POST /api/appointments`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use meridian_core::{
  appointment::NewAppointment,
  objects::ObjectStorage,
  store::Gateway,
  validate::Validate as _,
};

use crate::{AppState, body::RawJson, error::ApiError};

/// `POST /api/appointments`: returns 201 + the booking with status
/// `pending`. `preferredDate` accepts `YYYY-MM-DD` or an RFC 3339 instant.
pub async fn create<G, O>(
  State(state): State<AppState<G, O>>,
  RawJson(raw): RawJson,
) -> Result<impl IntoResponse, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let input = NewAppointment::validate(&raw)?;
  let appt = state
    .gateway
    .create_appointment(input)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %appt.id, service = %appt.service_type, "appointment booked");
  Ok((StatusCode::CREATED, Json(appt)))
}
