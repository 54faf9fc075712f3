//! Core types and trait definitions for the Meridian advisory site.
//!
//! Entity shapes, their insert contracts and validation, and the storage
//! traits live here. The crate has no HTTP or database dependencies; every
//! other crate in the workspace builds on it.

// We intentionally use native `async fn` / RPITIT in traits.
#![allow(async_fn_in_trait)]

pub mod appointment;
pub mod blog;
pub mod contact;
pub mod document;
pub mod error;
pub mod identity;
pub mod newsletter;
pub mod objects;
pub mod status;
pub mod store;
pub mod validate;
pub mod whitepaper;

pub use error::{Error, Result, ValidationError};
pub use identity::CallerIdentity;
pub use validate::{EntityKind, Validate, ValidatedInput, validate};
