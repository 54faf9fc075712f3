//! The `ObjectStorage` trait: where uploaded document bytes go.
//!
//! The rest of the system never looks inside an object; it only persists the
//! opaque path a backend hands back.

use std::future::Future;

use bytes::Bytes;

pub trait ObjectStorage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` and return the path under which they can be fetched,
  /// e.g. `/objects/uploads/<uuid>`.
  fn put(
    &self,
    bytes: Bytes,
    content_type: Option<String>,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}
