use std::{collections::HashSet, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use meridian_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;
use crate::objects::MemoryObjectStore;

const ADMIN: &str = "admin-1";
const UPLOAD_LIMIT: usize = 64;

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn make_state() -> (AppState<SqliteStore, MemoryObjectStore>, MemoryObjectStore) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let objects = MemoryObjectStore::new();
  let config = ApiConfig {
    admin_user_ids: HashSet::from([ADMIN.to_owned()]),
    max_upload_bytes: UPLOAD_LIMIT,
    ..ApiConfig::default()
  };
  let identity = HeaderIdentity::from_config(&config.identity).unwrap();
  let state = AppState {
    gateway:  Arc::new(store),
    objects:  Arc::new(objects.clone()),
    identity: Arc::new(identity),
    config:   Arc::new(config),
  };
  (state, objects)
}

async fn send(
  state: &AppState<SqliteStore, MemoryObjectStore>,
  method: &str,
  uri: &str,
  user: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(user) = user {
    builder = builder.header("x-auth-user-id", user);
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_of(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn post_body(slug: &str, published: bool) -> Value {
  json!({
    "title": "Rates outlook",
    "slug": slug,
    "excerpt": "Short",
    "content": "Long",
    "author": "Grace",
    "category": "markets",
    "isPublished": published,
  })
}

// ── Public forms ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_submission_returns_created_record() {
  let (state, _) = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/contacts",
    None,
    Some(json!({
      "name": "Ada Lovelace",
      "email": "ada@example.com",
      "subject": "Retirement",
      "message": "Please call me.",
      "status": "closed",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = json_of(resp).await;
  assert_eq!(body["status"], "new", "caller-supplied status must be ignored");
  assert!(!body["id"].as_str().unwrap().is_empty());
  assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn invalid_email_reports_field_and_reason() {
  let (state, _) = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/contacts",
    None,
    Some(json!({ "name": "A", "email": "nope", "subject": "s", "message": "m" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json_of(resp).await;
  assert_eq!(body["field"], "email");
  assert_eq!(body["reason"], "must be a valid email address");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
  let (state, _) = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/appointments")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_of(resp).await["field"], "body");
}

#[tokio::test]
async fn appointment_booking() {
  let (state, _) = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/appointments",
    None,
    Some(json!({
      "name": "Ada",
      "email": "ada@example.com",
      "preferredDate": "2030-04-01",
      "preferredTime": "10:00",
      "serviceType": "planning",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = json_of(resp).await;
  assert_eq!(body["status"], "pending");
  assert_eq!(body["serviceType"], "planning");
}

#[tokio::test]
async fn subscribing_twice_is_idempotent() {
  let (state, _) = make_state().await;
  let first = send(
    &state,
    "POST",
    "/api/newsletter/subscribe",
    None,
    Some(json!({ "email": "x@y.com" })),
  )
  .await;
  assert_eq!(first.status(), StatusCode::CREATED);
  let first = json_of(first).await;

  let second = send(
    &state,
    "POST",
    "/api/newsletter/subscribe",
    None,
    Some(json!({ "email": "X@Y.com" })),
  )
  .await;
  assert_eq!(second.status(), StatusCode::CREATED);
  let second = json_of(second).await;
  assert_eq!(second["isActive"], true);
  assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn unsubscribe_then_resubscribe() {
  let (state, _) = make_state().await;
  send(&state, "POST", "/api/newsletter/subscribe", None, Some(json!({ "email": "x@y.com" })))
    .await;

  let resp = send(
    &state,
    "POST",
    "/api/newsletter/unsubscribe",
    None,
    Some(json!({ "email": "x@y.com" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_of(resp).await["message"], "Successfully unsubscribed");

  let resp = send(
    &state,
    "POST",
    "/api/newsletter/subscribe",
    None,
    Some(json!({ "email": "x@y.com" })),
  )
  .await;
  assert_eq!(json_of(resp).await["isActive"], true);
}

#[tokio::test]
async fn unsubscribe_unknown_email_is_ok() {
  let (state, _) = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/newsletter/unsubscribe",
    None,
    Some(json!({ "email": "ghost@y.com" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ── Public content ────────────────────────────────────────────────────────────

#[tokio::test]
async fn drafts_are_hidden_from_public_blog() {
  let (state, _) = make_state().await;
  let resp = send(&state, "POST", "/api/admin/blog", Some(ADMIN), Some(post_body("draft", false)))
    .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  send(&state, "POST", "/api/admin/blog", Some(ADMIN), Some(post_body("live", true))).await;

  let list = json_of(send(&state, "GET", "/api/blog", None, None).await).await;
  let slugs: Vec<&str> = list.as_array().unwrap().iter().map(|p| p["slug"].as_str().unwrap()).collect();
  assert_eq!(slugs, vec!["live"]);

  let resp = send(&state, "GET", "/api/blog/draft", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = send(&state, "GET", "/api/blog/live", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let post = json_of(resp).await;
  assert!(post["publishedAt"].is_string());
}

#[tokio::test]
async fn unknown_slug_is_404() {
  let (state, _) = make_state().await;
  let resp = send(&state, "GET", "/api/blog/nothing-here", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn whitepaper_download_counts() {
  let (state, _) = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/admin/whitepapers",
    Some(ADMIN),
    Some(json!({
      "title": "Tax-efficient investing",
      "description": "A guide",
      "author": "Grace",
      "fileUrl": "/files/tax.pdf",
      "isPublished": true,
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let id = json_of(resp).await["id"].as_str().unwrap().to_owned();

  for _ in 0..2 {
    let resp = send(&state, "POST", &format!("/api/whitepapers/{id}/download"), None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  let list = json_of(send(&state, "GET", "/api/whitepapers", None, None).await).await;
  assert_eq!(list[0]["downloadCount"], 2);
}

#[tokio::test]
async fn download_of_unknown_whitepaper_is_404() {
  let (state, _) = make_state().await;
  let id = uuid::Uuid::new_v4();
  let resp = send(&state, "POST", &format!("/api/whitepapers/{id}/download"), None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = send(&state, "POST", "/api/whitepapers/not-a-uuid/download", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Session ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_redirects_to_provider() {
  let (state, _) = make_state().await;
  let resp = send(&state, "GET", "/api/login", None, None).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(resp.headers()[header::LOCATION], "/auth/login");

  let resp = send(&state, "GET", "/api/logout", None, None).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(resp.headers()[header::LOCATION], "/auth/logout");
}

#[tokio::test]
async fn current_user_requires_identity() {
  let (state, _) = make_state().await;
  let resp = send(&state, "GET", "/api/auth/user", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "GET", "/api/auth/user", Some("user-7"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_of(resp).await["id"], "user-7");
}

// ── Client portal ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn documents_require_identity() {
  let (state, _) = make_state().await;
  let resp = send(&state, "GET", "/api/documents", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "POST", "/api/documents", None, Some(json!({}))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn documents_are_scoped_to_the_caller() {
  let (state, _) = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/documents",
    Some("alice"),
    Some(json!({
      "name": "passport.pdf",
      "type": "identification",
      "objectPath": "/objects/uploads/a",
      "userId": "mallory",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let doc = json_of(resp).await;
  assert_eq!(doc["userId"], "alice");
  assert_eq!(doc["status"], "pending");

  let alice = json_of(send(&state, "GET", "/api/documents", Some("alice"), None).await).await;
  assert_eq!(alice.as_array().unwrap().len(), 1);

  let mallory = json_of(send(&state, "GET", "/api/documents", Some("mallory"), None).await).await;
  assert!(mallory.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upload_then_register() {
  let (state, objects) = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/uploads")
    .header("x-auth-user-id", "alice")
    .header(header::CONTENT_TYPE, "application/pdf")
    .body(Body::from("%PDF-1.7 tiny"))
    .unwrap();
  let resp = router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::CREATED);
  let path = json_of(resp).await["objectPath"].as_str().unwrap().to_owned();

  let stored = objects.get(&path).unwrap();
  assert_eq!(stored.content_type.as_deref(), Some("application/pdf"));

  let resp = send(
    &state,
    "POST",
    "/api/documents",
    Some("alice"),
    Some(json!({ "name": "statement.pdf", "type": "other", "objectPath": path })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_of(resp).await["objectPath"], path.as_str());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
  let (state, objects) = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/uploads")
    .header("x-auth-user-id", "alice")
    .body(Body::from(vec![b'x'; UPLOAD_LIMIT + 1]))
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  assert!(objects.is_empty());
}

#[tokio::test]
async fn anonymous_upload_is_rejected() {
  let (state, objects) = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/uploads")
    .body(Body::from("data"))
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(objects.is_empty());
}

// ── Back office ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_check_role() {
  let (state, _) = make_state().await;
  let resp = send(&state, "GET", "/api/admin/contacts", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "GET", "/api/admin/contacts", Some("alice"), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = send(&state, "GET", "/api/admin/contacts", Some(ADMIN), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn contact_status_update() {
  let (state, _) = make_state().await;
  let created = json_of(
    send(
      &state,
      "POST",
      "/api/contacts",
      None,
      Some(json!({ "name": "A", "email": "a@b.com", "subject": "s", "message": "m" })),
    )
    .await,
  )
  .await;
  let id = created["id"].as_str().unwrap();

  let resp = send(
    &state,
    "PATCH",
    &format!("/api/admin/contacts/{id}/status"),
    Some(ADMIN),
    Some(json!({ "status": "contacted" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_of(resp).await["status"], "contacted");

  let resp = send(
    &state,
    "PATCH",
    &format!("/api/admin/contacts/{id}/status"),
    Some(ADMIN),
    Some(json!({ "status": "archived" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_of(resp).await["field"], "status");
}

#[tokio::test]
async fn document_review_records_notes() {
  let (state, _) = make_state().await;
  let doc = json_of(
    send(
      &state,
      "POST",
      "/api/documents",
      Some("alice"),
      Some(json!({ "name": "kyc.pdf", "type": "kyc", "objectPath": "/objects/uploads/k" })),
    )
    .await,
  )
  .await;
  let id = doc["id"].as_str().unwrap();

  let resp = send(
    &state,
    "PATCH",
    &format!("/api/admin/documents/{id}/status"),
    Some(ADMIN),
    Some(json!({ "status": "rejected", "reviewNotes": "Expired" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let doc = json_of(resp).await;
  assert_eq!(doc["status"], "rejected");
  assert_eq!(doc["reviewNotes"], "Expired");
  assert!(doc["reviewedAt"].is_string());
}

#[tokio::test]
async fn status_update_of_missing_row_is_404() {
  let (state, _) = make_state().await;
  let id = uuid::Uuid::new_v4();
  let resp = send(
    &state,
    "PATCH",
    &format!("/api/admin/appointments/{id}/status"),
    Some(ADMIN),
    Some(json!({ "status": "confirmed" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_slug_is_conflict() {
  let (state, _) = make_state().await;
  let first = send(&state, "POST", "/api/admin/blog", Some(ADMIN), Some(post_body("same", true)))
    .await;
  assert_eq!(first.status(), StatusCode::CREATED);
  let second = send(&state, "POST", "/api/admin/blog", Some(ADMIN), Some(post_body("same", false)))
    .await;
  assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn publishing_a_draft_makes_it_public() {
  let (state, _) = make_state().await;
  let post = json_of(
    send(&state, "POST", "/api/admin/blog", Some(ADMIN), Some(post_body("later", false))).await,
  )
  .await;
  let id = post["id"].as_str().unwrap();

  let resp = send(
    &state,
    "PATCH",
    &format!("/api/admin/blog/{id}"),
    Some(ADMIN),
    Some(json!({ "isPublished": true, "title": "Rates outlook, revised" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let post = json_of(resp).await;
  assert_eq!(post["title"], "Rates outlook, revised");
  assert!(post["publishedAt"].is_string());

  let resp = send(&state, "GET", "/api/blog/later", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let admin_list = json_of(send(&state, "GET", "/api/admin/blog", Some(ADMIN), None).await).await;
  assert_eq!(admin_list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn slug_cannot_be_patched() {
  let (state, _) = make_state().await;
  let post = json_of(
    send(&state, "POST", "/api/admin/blog", Some(ADMIN), Some(post_body("fixed", true))).await,
  )
  .await;
  let id = post["id"].as_str().unwrap();
  let resp = send(
    &state,
    "PATCH",
    &format!("/api/admin/blog/{id}"),
    Some(ADMIN),
    Some(json!({ "slug": "moved" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_of(resp).await["field"], "slug");
}
