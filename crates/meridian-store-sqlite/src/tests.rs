//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone as _, Utc};
use meridian_core::{
  appointment::NewAppointment,
  blog::{BlogPostPatch, NewBlogPost},
  contact::NewContact,
  document::{DocumentType, NewDocument},
  newsletter::NewSubscriber,
  status::{AppointmentStatus, ContactStatus, DocumentStatus},
  store::Gateway,
  validate::Validate as _,
  whitepaper::NewWhitepaper,
};
use serde_json::json;
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn contact() -> NewContact {
  NewContact::validate(&json!({
    "name": "Ada",
    "email": "ada@x.com",
    "subject": "General",
    "message": "Hi",
  }))
  .unwrap()
}

fn document(name: &str) -> NewDocument {
  NewDocument {
    name:        name.into(),
    doc_type:    DocumentType::Kyc,
    object_path: format!("/objects/uploads/{name}"),
  }
}

fn post(slug: &str, published: bool) -> NewBlogPost {
  NewBlogPost {
    title:        format!("Title of {slug}"),
    slug:         slug.into(),
    excerpt:      "excerpt".into(),
    content:      "content".into(),
    author:       "Research Desk".into(),
    category:     "Markets".into(),
    image_url:    None,
    is_published: published,
    published_at: None,
  }
}

fn paper(title: &str, published: bool) -> NewWhitepaper {
  NewWhitepaper {
    title:        title.into(),
    description:  "desc".into(),
    author:       "Research Desk".into(),
    file_url:     format!("/objects/papers/{title}.pdf"),
    is_published: published,
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_gets_system_fields() {
  let s = store().await;
  let c = s.create_contact(contact()).await.unwrap();
  assert_eq!(c.status, ContactStatus::New);

  let all = s.list_contacts().await.unwrap();
  assert_eq!(all, vec![c]);
}

#[tokio::test]
async fn contacts_list_newest_first() {
  let s = store().await;
  let first = s.create_contact(contact()).await.unwrap();
  let second = s.create_contact(contact()).await.unwrap();
  let third = s.create_contact(contact()).await.unwrap();

  let ids: Vec<_> = s.list_contacts().await.unwrap().into_iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn contact_status_overwrites_freely() {
  let s = store().await;
  let c = s.create_contact(contact()).await.unwrap();

  let closed = s
    .update_contact_status(c.id, ContactStatus::Closed)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(closed.status, ContactStatus::Closed);

  let reopened = s
    .update_contact_status(c.id, ContactStatus::New)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reopened.status, ContactStatus::New);
  assert_eq!(reopened.created_at, c.created_at);
}

#[tokio::test]
async fn status_update_of_missing_row_is_none() {
  let s = store().await;
  assert!(
    s.update_contact_status(Uuid::new_v4(), ContactStatus::Closed)
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.update_appointment_status(Uuid::new_v4(), AppointmentStatus::Confirmed)
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.update_document_status(Uuid::new_v4(), DocumentStatus::Verified, None)
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Newsletter ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn resubscribe_reuses_the_row() {
  let s = store().await;
  let sub = NewSubscriber { email: "a@b.com".into() };

  let first = s.subscribe(sub.clone()).await.unwrap();
  assert!(first.is_active);

  assert!(s.unsubscribe("a@b.com").await.unwrap());

  let second = s.subscribe(sub).await.unwrap();
  assert_eq!(second.id, first.id);
  assert!(second.is_active);
  assert!(second.subscribed_at >= first.subscribed_at);
}

#[tokio::test]
async fn subscribe_twice_while_active() {
  let s = store().await;
  let sub = NewSubscriber { email: "a@b.com".into() };
  let first = s.subscribe(sub.clone()).await.unwrap();
  let second = s.subscribe(sub).await.unwrap();
  assert_eq!(first.id, second.id);
  assert!(second.is_active);
}

#[tokio::test]
async fn unsubscribe_unknown_email_matches_nothing() {
  let s = store().await;
  assert!(!s.unsubscribe("nobody@x.com").await.unwrap());
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn documents_are_scoped_to_their_owner() {
  let s = store().await;
  let mine = s.create_document("u1".into(), document("a.pdf")).await.unwrap();
  s.create_document("u2".into(), document("b.pdf")).await.unwrap();
  let mine_too = s.create_document("u1".into(), document("c.pdf")).await.unwrap();

  let listed = s.list_documents_by_owner("u1").await.unwrap();
  assert_eq!(listed.len(), 2);
  assert!(listed.iter().all(|d| d.user_id == "u1"));
  assert_eq!(listed[0].id, mine_too.id);
  assert_eq!(listed[1].id, mine.id);

  assert!(s.list_documents_by_owner("u3").await.unwrap().is_empty());
}

#[tokio::test]
async fn document_review_stamps_reviewed_at() {
  let s = store().await;
  let d = s.create_document("u1".into(), document("a.pdf")).await.unwrap();
  assert_eq!(d.status, DocumentStatus::Pending);
  assert!(d.reviewed_at.is_none());

  let reviewed = s
    .update_document_status(d.id, DocumentStatus::Rejected, Some("blurry".into()))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reviewed.status, DocumentStatus::Rejected);
  assert_eq!(reviewed.review_notes.as_deref(), Some("blurry"));
  assert!(reviewed.reviewed_at.is_some());
  assert_eq!(reviewed.user_id, "u1");
}

// ─── Blog ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn slug_lookup_round_trips() {
  let s = store().await;
  let created = s.create_blog_post(post("rates-2025", true)).await.unwrap();

  let fetched = s.get_blog_post_by_slug("rates-2025").await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert!(s.get_blog_post_by_slug("rates-2026").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_slug_is_reported() {
  let s = store().await;
  s.create_blog_post(post("same", false)).await.unwrap();
  let err = s.create_blog_post(post("same", true)).await.unwrap_err();
  assert!(matches!(err, Error::SlugTaken(slug) if slug == "same"));
}

#[tokio::test]
async fn unpublished_posts_are_hidden_from_public_listing() {
  let s = store().await;
  s.create_blog_post(post("draft", false)).await.unwrap();
  let live = s.create_blog_post(post("live", true)).await.unwrap();
  assert!(live.published_at.is_some());

  let public = s.list_blog_posts(true).await.unwrap();
  assert_eq!(public.len(), 1);
  assert_eq!(public[0].slug, "live");

  assert_eq!(s.list_blog_posts(false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn published_posts_order_by_publish_date() {
  let s = store().await;
  let mut older = post("older", true);
  older.published_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
  let mut newer = post("newer", true);
  newer.published_at = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

  // Insert the newer one first so creation order disagrees with publish order.
  s.create_blog_post(newer).await.unwrap();
  s.create_blog_post(older).await.unwrap();

  let slugs: Vec<_> = s
    .list_blog_posts(true)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.slug)
    .collect();
  assert_eq!(slugs, vec!["newer", "older"]);
}

#[tokio::test]
async fn patch_keeps_slug_and_publishes() {
  let s = store().await;
  let draft = s.create_blog_post(post("draft", false)).await.unwrap();
  assert!(draft.published_at.is_none());

  let patch = BlogPostPatch {
    title: Some("Final title".into()),
    is_published: Some(true),
    image_url: Some(Some("/img/cover.png".into())),
    ..Default::default()
  };
  let updated = s.update_blog_post(draft.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.slug, "draft");
  assert_eq!(updated.title, "Final title");
  assert_eq!(updated.content, draft.content);
  assert!(updated.is_published);
  assert!(updated.published_at.is_some());
  assert_eq!(updated.image_url.as_deref(), Some("/img/cover.png"));
  assert!(updated.updated_at >= draft.updated_at);

  let cleared = s
    .update_blog_post(draft.id, BlogPostPatch { image_url: Some(None), ..Default::default() })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(cleared.image_url, None);
  assert_eq!(cleared.published_at, updated.published_at);
}

#[tokio::test]
async fn patch_of_missing_post_is_none() {
  let s = store().await;
  let res = s.update_blog_post(Uuid::new_v4(), BlogPostPatch::default()).await.unwrap();
  assert!(res.is_none());
}

// ─── Whitepapers ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn download_counter_is_monotonic() {
  let s = store().await;
  let w = s.create_whitepaper(paper("outlook", true)).await.unwrap();
  assert_eq!(w.download_count, 0);

  for _ in 0..5 {
    assert!(s.increment_download(w.id).await.unwrap());
  }

  let listed = s.list_whitepapers(true).await.unwrap();
  assert_eq!(listed[0].download_count, 5);
}

#[tokio::test]
async fn increment_of_missing_whitepaper_reports_absence() {
  let s = store().await;
  assert!(!s.increment_download(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn unpublished_whitepapers_are_hidden() {
  let s = store().await;
  s.create_whitepaper(paper("draft", false)).await.unwrap();
  s.create_whitepaper(paper("live", true)).await.unwrap();

  let public = s.list_whitepapers(true).await.unwrap();
  assert_eq!(public.len(), 1);
  assert_eq!(public[0].title, "live");
  assert_eq!(s.list_whitepapers(false).await.unwrap().len(), 2);
}

// ─── Appointments ────────────────────────────────────────────────────────────

#[tokio::test]
async fn appointment_lifecycle() {
  let s = store().await;
  let input = NewAppointment::validate(&json!({
    "name": "Grace",
    "email": "grace@navy.mil",
    "preferredDate": "2025-11-03",
    "preferredTime": "10:00",
    "serviceType": "retirement-planning",
    "message": "Looking forward to it",
  }))
  .unwrap();

  let appt = s.create_appointment(input.clone()).await.unwrap();
  assert_eq!(appt.status, AppointmentStatus::Pending);
  assert_eq!(appt.preferred_date, input.preferred_date);

  let confirmed = s
    .update_appointment_status(appt.id, AppointmentStatus::Confirmed)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

  let all = s.list_appointments().await.unwrap();
  assert_eq!(all, vec![confirmed]);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_rows() {
  let path = std::env::temp_dir().join(format!("meridian-{}.db", Uuid::new_v4()));

  let s = SqliteStore::open(&path).await.unwrap();
  let c = s.create_contact(contact()).await.unwrap();
  drop(s);

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.list_contacts().await.unwrap(), vec![c]);

  let _ = std::fs::remove_file(&path);
}
