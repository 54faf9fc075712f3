//! SQLite backend for the Meridian persistence gateway.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on one long-lived
//! connection thread without blocking the async runtime. Requests share that
//! connection; none of them pay a connection setup cost.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
