//! Query cache for server state shown by the UI.
//!
//! One entry per [`CacheKey`]. An entry moves `Idle → Loading → Success |
//! Error` and re-enters `Loading` on a refetch. Invalidating a key drops its
//! entry, so the next [`QueryCache::fetch`] goes back to the server.
//!
//! A fetch that was already in flight when its key was invalidated still
//! returns its result to the caller, but the result is not cached: it may
//! predate the write that caused the invalidation.

use std::{
  any::Any,
  collections::HashMap,
  fmt,
  future::Future,
  sync::{Arc, Mutex, MutexGuard},
};

use crate::error::ClientError;

// ─── Keys ─────────────────────────────────────────────────────────────────────

/// One cache entry per (collection, filter) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
  /// Published posts, as listed on the public blog.
  BlogPosts,
  /// A single published post.
  BlogPost(String),
  /// Published whitepapers.
  Whitepapers,
  /// The document list of one portal user.
  Documents(String),
  CurrentUser,
  /// Back-office inbox of contact requests.
  AdminContacts,
  /// Back-office appointment list.
  AdminAppointments,
}

// ─── State ────────────────────────────────────────────────────────────────────

/// What the UI should render for one query.
pub enum QueryState<T> {
  Idle,
  Loading,
  Success(Arc<T>),
  Error(ClientError),
}

impl<T> QueryState<T> {
  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data.as_ref()),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&ClientError> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }

  pub fn is_loading(&self) -> bool { matches!(self, QueryState::Loading) }
}

impl<T> Clone for QueryState<T> {
  fn clone(&self) -> Self {
    match self {
      QueryState::Idle => QueryState::Idle,
      QueryState::Loading => QueryState::Loading,
      QueryState::Success(data) => QueryState::Success(Arc::clone(data)),
      QueryState::Error(e) => QueryState::Error(e.clone()),
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueryState::Idle => f.write_str("Idle"),
      QueryState::Loading => f.write_str("Loading"),
      QueryState::Success(data) => f.debug_tuple("Success").field(data).finish(),
      QueryState::Error(e) => f.debug_tuple("Error").field(e).finish(),
    }
  }
}

// ─── Cache ────────────────────────────────────────────────────────────────────

type Erased = Arc<dyn Any + Send + Sync>;

enum Entry {
  /// `ticket` identifies the fetch allowed to settle this entry.
  Loading { ticket: u64 },
  Success(Erased),
  Error(ClientError),
}

#[derive(Default)]
struct Inner {
  entries:     HashMap<CacheKey, Entry>,
  next_ticket: u64,
}

/// Cache of query results, owned by the UI root and passed down by
/// reference. Never holds its lock across an await.
#[derive(Default)]
pub struct QueryCache {
  inner: Mutex<Inner>,
}

impl QueryCache {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// The current state of `key`, viewed as a `T`.
  ///
  /// An entry cached under a different type reads as `Idle`.
  pub fn state<T: Send + Sync + 'static>(&self, key: &CacheKey) -> QueryState<T> {
    match self.lock().entries.get(key) {
      None => QueryState::Idle,
      Some(Entry::Loading { .. }) => QueryState::Loading,
      Some(Entry::Error(e)) => QueryState::Error(e.clone()),
      Some(Entry::Success(data)) => match Arc::clone(data).downcast::<T>() {
        Ok(data) => QueryState::Success(data),
        Err(_) => {
          tracing::warn!(?key, "cached value has a different type");
          QueryState::Idle
        }
      },
    }
  }

  /// Return the cached success for `key`, or run `fetcher` and cache its
  /// outcome.
  pub async fn fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> QueryState<T>
  where
    T: Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
  {
    if let QueryState::Success(data) = self.state::<T>(&key) {
      return QueryState::Success(data);
    }
    self.refetch(key, fetcher).await
  }

  /// Run `fetcher` regardless of what is cached.
  pub async fn refetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> QueryState<T>
  where
    T: Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
  {
    let ticket = {
      let mut inner = self.lock();
      let ticket = inner.next_ticket;
      inner.next_ticket += 1;
      inner.entries.insert(key.clone(), Entry::Loading { ticket });
      ticket
    };

    let result = fetcher().await;

    let mut inner = self.lock();
    let current = matches!(
      inner.entries.get(&key),
      Some(Entry::Loading { ticket: t }) if *t == ticket
    );
    match result {
      Ok(data) => {
        let data = Arc::new(data);
        if current {
          let erased: Erased = data.clone();
          inner.entries.insert(key, Entry::Success(erased));
        }
        QueryState::Success(data)
      }
      Err(e) => {
        if current {
          inner.entries.insert(key, Entry::Error(e.clone()));
        }
        QueryState::Error(e)
      }
    }
  }

  /// Drop the entry for `key`.
  pub fn invalidate(&self, key: &CacheKey) {
    if self.lock().entries.remove(key).is_some() {
      tracing::debug!(?key, "invalidated");
    }
  }

  /// Drop every entry whose key matches `pred`.
  pub fn invalidate_where(&self, pred: impl Fn(&CacheKey) -> bool) {
    self.lock().entries.retain(|key, _| !pred(key));
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  fn counted(
    calls: &AtomicUsize,
    value: u32,
  ) -> impl FnOnce() -> std::future::Ready<Result<u32, ClientError>> + '_ {
    move || {
      calls.fetch_add(1, Ordering::SeqCst);
      std::future::ready(Ok(value))
    }
  }

  #[tokio::test]
  async fn success_is_served_from_cache() {
    let cache = QueryCache::new();
    let calls = AtomicUsize::new(0);

    assert!(matches!(cache.state::<u32>(&CacheKey::Whitepapers), QueryState::Idle));
    let first = cache.fetch(CacheKey::Whitepapers, counted(&calls, 1)).await;
    assert_eq!(first.data(), Some(&1));

    let second = cache.fetch(CacheKey::Whitepapers, counted(&calls, 2)).await;
    assert_eq!(second.data(), Some(&1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn invalidate_forces_a_reload() {
    let cache = QueryCache::new();
    let calls = AtomicUsize::new(0);
    cache.fetch(CacheKey::BlogPosts, counted(&calls, 1)).await;

    cache.invalidate(&CacheKey::BlogPosts);
    assert!(matches!(cache.state::<u32>(&CacheKey::BlogPosts), QueryState::Idle));

    let state = cache.fetch(CacheKey::BlogPosts, counted(&calls, 2)).await;
    assert_eq!(state.data(), Some(&2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn errors_are_cached_but_retried() {
    let cache = QueryCache::new();
    let state: QueryState<u32> = cache
      .fetch(CacheKey::CurrentUser, || std::future::ready(Err(ClientError::Unauthorized)))
      .await;
    assert_eq!(state.error(), Some(&ClientError::Unauthorized));
    assert_eq!(
      cache.state::<u32>(&CacheKey::CurrentUser).error(),
      Some(&ClientError::Unauthorized)
    );

    let calls = AtomicUsize::new(0);
    let state = cache.fetch(CacheKey::CurrentUser, counted(&calls, 7)).await;
    assert_eq!(state.data(), Some(&7));
  }

  #[tokio::test]
  async fn loading_while_in_flight() {
    let cache = QueryCache::new();
    let key = CacheKey::BlogPost("q3-outlook".into());
    let state = cache
      .fetch(key.clone(), || async {
        assert!(cache.state::<u32>(&key).is_loading());
        Ok(3u32)
      })
      .await;
    assert_eq!(state.data(), Some(&3));
  }

  #[tokio::test]
  async fn invalidation_during_fetch_discards_result() {
    let cache = QueryCache::new();
    let key = CacheKey::Documents("alice".into());
    let state = cache
      .fetch(key.clone(), || async {
        cache.invalidate(&key);
        Ok(vec!["stale"])
      })
      .await;
    assert_eq!(state.data().map(Vec::len), Some(1));
    assert!(matches!(cache.state::<Vec<&str>>(&key), QueryState::Idle));
  }

  #[tokio::test]
  async fn invalidate_where_matches_by_shape() {
    let cache = QueryCache::new();
    let calls = AtomicUsize::new(0);
    cache.fetch(CacheKey::BlogPost("a".into()), counted(&calls, 1)).await;
    cache.fetch(CacheKey::BlogPost("b".into()), counted(&calls, 2)).await;
    cache.fetch(CacheKey::Whitepapers, counted(&calls, 3)).await;

    cache.invalidate_where(|k| matches!(k, CacheKey::BlogPost(_)));

    assert!(matches!(cache.state::<u32>(&CacheKey::BlogPost("a".into())), QueryState::Idle));
    assert!(matches!(cache.state::<u32>(&CacheKey::BlogPost("b".into())), QueryState::Idle));
    assert_eq!(cache.state::<u32>(&CacheKey::Whitepapers).data(), Some(&3));
  }

  #[tokio::test]
  async fn wrong_type_reads_as_idle() {
    let cache = QueryCache::new();
    cache.fetch(CacheKey::Whitepapers, || std::future::ready(Ok(1u32))).await;
    assert!(matches!(cache.state::<String>(&CacheKey::Whitepapers), QueryState::Idle));
  }
}
