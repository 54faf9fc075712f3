//! Error type for `meridian-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] meridian_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be decoded into its domain type.
  #[error("decode error: {0}")]
  Decode(String),

  /// A blog post with this slug already exists.
  #[error("slug already taken: {0}")]
  SlugTaken(String),
}

impl meridian_core::store::StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::SlugTaken(_)) }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Error::Database(e.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
