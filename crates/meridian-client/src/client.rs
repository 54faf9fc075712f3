//! Async HTTP client wrapping the Meridian JSON API.

use std::time::Duration;

use meridian_core::{
  CallerIdentity,
  appointment::{Appointment, NewAppointment},
  blog::{BlogPost, BlogPostPatch, NewBlogPost},
  contact::{Contact, NewContact},
  document::{Document, NewDocument},
  newsletter::{NewSubscriber, Newsletter},
  status::{AppointmentStatus, ContactStatus, DocumentStatus},
  whitepaper::{NewWhitepaper, Whitepaper},
};
use reqwest::{Client, Method, RequestBuilder, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use uuid::Uuid;

use crate::error::ClientError;

pub const USER_ID_HEADER: &str = "x-auth-user-id";
pub const EMAIL_HEADER: &str = "x-auth-user-email";
pub const NAME_HEADER: &str = "x-auth-user-name";
pub const AVATAR_HEADER: &str = "x-auth-user-avatar";

/// Connection settings for the Meridian API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  /// Sent as the identity-provider headers on every request. Only useful
  /// when talking to the server directly, without the fronting proxy.
  pub identity: Option<CallerIdentity>,
}

impl ClientConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self { base_url: base_url.into(), identity: None }
  }

  pub fn with_identity(mut self, identity: CallerIdentity) -> Self {
    self.identity = Some(identity);
    self
  }
}

/// Async HTTP client for the Meridian JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ClientConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
  object_path: String,
}

impl ApiClient {
  pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  /// The identity forwarded with each request, if any.
  pub fn identity(&self) -> Option<&CallerIdentity> { self.config.identity.as_ref() }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let mut req = self.client.request(method, self.url(path));
    if let Some(id) = &self.config.identity {
      req = req.header(USER_ID_HEADER, &id.id);
      if let Some(email) = &id.email {
        req = req.header(EMAIL_HEADER, email);
      }
      if let Some(name) = &id.display_name {
        req = req.header(NAME_HEADER, name);
      }
      if let Some(avatar) = &id.avatar_url {
        req = req.header(AVATAR_HEADER, avatar);
      }
    }
    req
  }

  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
    let resp = req.send().await?;
    let status = resp.status();
    tracing::debug!(url = %resp.url(), %status, "response");
    if !status.is_success() {
      let body = resp.bytes().await.unwrap_or_default();
      return Err(ClientError::from_status(status, &body));
    }
    resp.json().await.map_err(|e| ClientError::Decode(e.to_string()))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
    self.send(self.request(Method::GET, path)).await
  }

  async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T, ClientError> {
    self.send(self.request(Method::POST, path).json(body)).await
  }

  async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T, ClientError> {
    self.send(self.request(Method::PATCH, path).json(body)).await
  }

  // ── Public forms ──────────────────────────────────────────────────────────

  /// `POST /api/contacts`
  pub async fn submit_contact(&self, input: &NewContact) -> Result<Contact, ClientError> {
    self.post("/contacts", input).await
  }

  /// `POST /api/newsletter/subscribe`
  pub async fn subscribe(&self, email: &str) -> Result<Newsletter, ClientError> {
    let body = NewSubscriber { email: email.to_owned() };
    self.post("/newsletter/subscribe", &body).await
  }

  /// `POST /api/newsletter/unsubscribe`
  pub async fn unsubscribe(&self, email: &str) -> Result<(), ClientError> {
    let body = NewSubscriber { email: email.to_owned() };
    let _: serde_json::Value = self.post("/newsletter/unsubscribe", &body).await?;
    Ok(())
  }

  /// `POST /api/appointments`
  pub async fn book_appointment(
    &self,
    input: &NewAppointment,
  ) -> Result<Appointment, ClientError> {
    self.post("/appointments", input).await
  }

  // ── Public content ────────────────────────────────────────────────────────

  /// `GET /api/blog`
  pub async fn list_blog_posts(&self) -> Result<Vec<BlogPost>, ClientError> {
    self.get("/blog").await
  }

  /// `GET /api/blog/{slug}`
  pub async fn get_blog_post(&self, slug: &str) -> Result<BlogPost, ClientError> {
    self.get(&format!("/blog/{slug}")).await
  }

  /// `GET /api/whitepapers`
  pub async fn list_whitepapers(&self) -> Result<Vec<Whitepaper>, ClientError> {
    self.get("/whitepapers").await
  }

  /// `POST /api/whitepapers/{id}/download`
  pub async fn record_download(&self, id: Uuid) -> Result<(), ClientError> {
    let _: serde_json::Value =
      self.post(&format!("/whitepapers/{id}/download"), &json!({})).await?;
    Ok(())
  }

  // ── Session & portal ──────────────────────────────────────────────────────

  /// `GET /api/auth/user`
  pub async fn current_user(&self) -> Result<CallerIdentity, ClientError> {
    self.get("/auth/user").await
  }

  /// `GET /api/documents`
  pub async fn list_documents(&self) -> Result<Vec<Document>, ClientError> {
    self.get("/documents").await
  }

  /// `POST /api/uploads`; returns the object path to register.
  pub async fn upload(
    &self,
    bytes: Vec<u8>,
    content_type: &str,
  ) -> Result<String, ClientError> {
    let req = self
      .request(Method::POST, "/uploads")
      .header(header::CONTENT_TYPE, content_type)
      .body(bytes);
    let resp: UploadResponse = self.send(req).await?;
    Ok(resp.object_path)
  }

  /// `POST /api/documents`
  pub async fn create_document(&self, input: &NewDocument) -> Result<Document, ClientError> {
    self.post("/documents", input).await
  }

  // ── Back office ───────────────────────────────────────────────────────────

  /// `GET /api/admin/contacts`
  pub async fn admin_contacts(&self) -> Result<Vec<Contact>, ClientError> {
    self.get("/admin/contacts").await
  }

  /// `PATCH /api/admin/contacts/{id}/status`
  pub async fn set_contact_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> Result<Contact, ClientError> {
    self.patch(&format!("/admin/contacts/{id}/status"), &json!({ "status": status })).await
  }

  /// `GET /api/admin/appointments`
  pub async fn admin_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
    self.get("/admin/appointments").await
  }

  /// `PATCH /api/admin/appointments/{id}/status`
  pub async fn set_appointment_status(
    &self,
    id: Uuid,
    status: AppointmentStatus,
  ) -> Result<Appointment, ClientError> {
    self
      .patch(&format!("/admin/appointments/{id}/status"), &json!({ "status": status }))
      .await
  }

  /// `PATCH /api/admin/documents/{id}/status`
  pub async fn review_document(
    &self,
    id: Uuid,
    status: DocumentStatus,
    review_notes: Option<&str>,
  ) -> Result<Document, ClientError> {
    let body = json!({ "status": status, "reviewNotes": review_notes });
    self.patch(&format!("/admin/documents/{id}/status"), &body).await
  }

  /// `GET /api/admin/blog`
  pub async fn admin_blog_posts(&self) -> Result<Vec<BlogPost>, ClientError> {
    self.get("/admin/blog").await
  }

  /// `POST /api/admin/blog`
  pub async fn create_blog_post(&self, input: &NewBlogPost) -> Result<BlogPost, ClientError> {
    self.post("/admin/blog", input).await
  }

  /// `PATCH /api/admin/blog/{id}`
  pub async fn update_blog_post(
    &self,
    id: Uuid,
    patch: &BlogPostPatch,
  ) -> Result<BlogPost, ClientError> {
    self.patch(&format!("/admin/blog/{id}"), patch).await
  }

  /// `GET /api/admin/whitepapers`
  pub async fn admin_whitepapers(&self) -> Result<Vec<Whitepaper>, ClientError> {
    self.get("/admin/whitepapers").await
  }

  /// `POST /api/admin/whitepapers`
  pub async fn create_whitepaper(
    &self,
    input: &NewWhitepaper,
  ) -> Result<Whitepaper, ClientError> {
    self.post("/admin/whitepapers", input).await
  }
}
