//! Per-form mutation state.
//!
//! ```text
//! Idle ──submit──▶ Pending ──2xx──▶ Success ──reset / expire / submit──▶ …
//!                          └─other─▶ Error   ──reset / expire / submit──▶ …
//! ```

use std::{
  future::Future,
  time::{Duration, Instant},
};

use crate::{
  cache::{CacheKey, QueryCache},
  error::ClientError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum MutationState<T> {
  Idle,
  Pending,
  Success(T),
  Error(ClientError),
}

/// Tracks one mutation (typically one form) through [`MutationState`].
#[derive(Debug)]
pub struct MutationTracker<T> {
  state:      MutationState<T>,
  settled_at: Option<Instant>,
}

impl<T> Default for MutationTracker<T> {
  fn default() -> Self { Self { state: MutationState::Idle, settled_at: None } }
}

impl<T> MutationTracker<T> {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> &MutationState<T> { &self.state }

  pub fn is_pending(&self) -> bool { matches!(self.state, MutationState::Pending) }

  /// Run `fut`. On success, every key returned by `invalidates` is dropped
  /// from `cache` before the state becomes `Success`; on failure nothing is
  /// invalidated.
  pub async fn submit<Fut, I>(
    &mut self,
    cache: &QueryCache,
    invalidates: I,
    fut: Fut,
  ) -> &MutationState<T>
  where
    Fut: Future<Output = Result<T, ClientError>>,
    I: FnOnce(&T) -> Vec<CacheKey>,
  {
    self.state = MutationState::Pending;
    self.settled_at = None;

    self.state = match fut.await {
      Ok(value) => {
        for key in invalidates(&value) {
          cache.invalidate(&key);
        }
        MutationState::Success(value)
      }
      Err(e) => {
        tracing::debug!(error = %e, "mutation failed");
        MutationState::Error(e)
      }
    };
    self.settled_at = Some(Instant::now());
    &self.state
  }

  /// Explicit dismiss, e.g. the user edits the form again.
  pub fn reset(&mut self) {
    self.state = MutationState::Idle;
    self.settled_at = None;
  }

  /// Return a settled tracker to `Idle` once `cooldown` has elapsed. Returns
  /// whether the state changed.
  pub fn expire(&mut self, cooldown: Duration) -> bool {
    match self.settled_at {
      Some(at) if at.elapsed() >= cooldown => {
        self.reset();
        true
      }
      _ => false,
    }
  }
}
