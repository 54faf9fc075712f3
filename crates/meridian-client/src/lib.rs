//! Typed access to the Meridian JSON API for front-end code.
//!
//! [`ApiClient`] issues the requests. [`QueryCache`] holds the server state a
//! UI is currently showing, keyed by [`CacheKey`], and [`MutationTracker`]
//! drives the pending/success/error cycle of a single form. The helpers in
//! [`queries`] tie the three together so that every successful mutation
//! invalidates exactly the cache entries whose data it changed.

pub mod cache;
pub mod client;
pub mod error;
pub mod mutation;
pub mod queries;

pub use cache::{CacheKey, QueryCache, QueryState};
pub use client::{ApiClient, ClientConfig};
pub use error::ClientError;
pub use mutation::{MutationState, MutationTracker};
