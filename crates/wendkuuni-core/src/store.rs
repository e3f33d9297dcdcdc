//! The `KeyValueStore` trait: the durable slot the repository persists into.
//!
//! Implemented by storage backends (e.g. `wendkuuni-store-sqlite`, or the
//! in-process [`MemoryStore`](crate::memory::MemoryStore)). Values are opaque
//! strings; the repository owns their format.

use std::future::Future;

/// Abstraction over a durable, namespaced string key-value store.
///
/// All methods return `Send` futures so the store can be driven from a
/// multi-threaded runtime.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, or `None` if it was never written.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Replace the value stored under `key`.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete `key`. Removing an absent key is not an error.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
