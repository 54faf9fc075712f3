//! Handlers for the public `/api/blog` endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use meridian_core::{blog::BlogPost, objects::ObjectStorage, store::Gateway};

use crate::{AppState, error::ApiError};

/// `GET /api/blog`: published posts only, newest first.
pub async fn list<G, O>(
  State(state): State<AppState<G, O>>,
) -> Result<Json<Vec<BlogPost>>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let posts = state.gateway.list_blog_posts(true).await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `GET /api/blog/{slug}`
///
/// Drafts are only reachable through the admin routes, so an unpublished
/// post answers 404 here just like a missing one.
pub async fn get_by_slug<G, O>(
  State(state): State<AppState<G, O>>,
  Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError>
where
  G: Gateway,
  O: ObjectStorage,
{
  let post = state
    .gateway
    .get_blog_post_by_slug(&slug)
    .await
    .map_err(ApiError::store)?
    .filter(|p| p.is_published)
    .ok_or_else(|| ApiError::NotFound(format!("blog post {slug} not found")))?;
  Ok(Json(post))
}
