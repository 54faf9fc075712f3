//! [`ObjectStorage`] backends.
//!
//! [`DiskObjectStore`] keeps uploads under a directory on the local file
//! system; [`MemoryObjectStore`] keeps them in a map and exists for tests and
//! local development.

use std::{
  collections::HashMap,
  convert::Infallible,
  path::PathBuf,
  sync::{Arc, Mutex},
};

use bytes::Bytes;
use meridian_core::objects::ObjectStorage;
use uuid::Uuid;

/// Every object path handed out starts with this prefix.
pub const UPLOAD_PREFIX: &str = "/objects/uploads/";

// ─── Disk ─────────────────────────────────────────────────────────────────────

/// Stores each upload as `<root>/uploads/<uuid>`. The content type is not
/// persisted.
#[derive(Debug, Clone)]
pub struct DiskObjectStore {
  root: PathBuf,
}

impl DiskObjectStore {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  #[cfg(test)]
  fn root(&self) -> &std::path::Path { &self.root }

  /// Map an object path back to the file holding it, if it is one of ours.
  #[cfg(test)]
  fn file_for(&self, object_path: &str) -> Option<PathBuf> {
    let name = object_path.strip_prefix(UPLOAD_PREFIX)?;
    let id = Uuid::parse_str(name).ok()?;
    Some(self.root.join("uploads").join(id.to_string()))
  }
}

impl ObjectStorage for DiskObjectStore {
  type Error = std::io::Error;

  async fn put(&self, bytes: Bytes, _content_type: Option<String>) -> Result<String, Self::Error> {
    let id = Uuid::new_v4();
    let dir = self.root.join("uploads");
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(id.to_string()), &bytes).await?;
    Ok(format!("{UPLOAD_PREFIX}{id}"))
  }
}

// ─── Memory ───────────────────────────────────────────────────────────────────

/// A stored object and the content type it was uploaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
  pub bytes:        Bytes,
  pub content_type: Option<String>,
}

/// In-process object store. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
  objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryObjectStore {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, object_path: &str) -> Option<StoredObject> {
    self
      .objects
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .get(object_path)
      .cloned()
  }

  pub fn len(&self) -> usize {
    self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl ObjectStorage for MemoryObjectStore {
  type Error = Infallible;

  async fn put(&self, bytes: Bytes, content_type: Option<String>) -> Result<String, Self::Error> {
    let path = format!("{UPLOAD_PREFIX}{}", Uuid::new_v4());
    self
      .objects
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .insert(path.clone(), StoredObject { bytes, content_type });
    Ok(path)
  }
}
