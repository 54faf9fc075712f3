//! Session endpoints. Login and logout belong to the external identity
//! provider, so these only redirect to it.

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use meridian_core::{CallerIdentity, objects::ObjectStorage, store::Gateway};

use crate::{AppState, auth::Caller};

fn redirect(location: &str) -> Response {
  (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// `GET /api/login`: 302 to the provider's sign-in page.
pub async fn login<G, O>(State(state): State<AppState<G, O>>) -> Response
where
  G: Gateway,
  O: ObjectStorage,
{
  redirect(&state.config.identity.login_url)
}

/// `GET /api/logout`: 302 to the provider's sign-out endpoint.
pub async fn logout<G, O>(State(state): State<AppState<G, O>>) -> Response
where
  G: Gateway,
  O: ObjectStorage,
{
  redirect(&state.config.identity.logout_url)
}

/// `GET /api/auth/user`: the resolved caller, or 401.
pub async fn current_user(Caller(caller): Caller) -> Json<CallerIdentity> { Json(caller) }
