//! [`MemoryStore`] — an in-process [`KeyValueStore`].
//!
//! Used by tests and by hosts that want a throwaway collection. Writes can be
//! made to fail on demand to exercise the repository's failure paths.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;

use crate::store::KeyValueStore;

#[derive(Debug, Error)]
pub enum MemoryStoreError {
  #[error("write to {0:?} rejected")]
  WriteRejected(String),
}

#[derive(Debug, Default)]
struct Inner {
  entries:     HashMap<String, String>,
  fail_writes: bool,
  writes:      usize,
}

/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Put a raw value in place without counting it as a write.
  pub fn seed(&self, key: impl Into<String>, raw: impl Into<String>) {
    self.lock().entries.insert(key.into(), raw.into());
  }

  /// The raw value under `key`.
  pub fn raw(&self, key: &str) -> Option<String> {
    self.lock().entries.get(key).cloned()
  }

  /// When `true`, every `set` and `remove` fails until switched back.
  pub fn fail_writes(&self, fail: bool) { self.lock().fail_writes = fail; }

  /// Number of successful `set`/`remove` calls so far.
  pub fn writes(&self) -> usize { self.lock().writes }
}

impl KeyValueStore for MemoryStore {
  type Error = MemoryStoreError;

  async fn get(&self, key: &str) -> Result<Option<String>, MemoryStoreError> {
    Ok(self.raw(key))
  }

  async fn set(&self, key: &str, value: String) -> Result<(), MemoryStoreError> {
    let mut inner = self.lock();
    if inner.fail_writes {
      return Err(MemoryStoreError::WriteRejected(key.to_owned()));
    }
    inner.entries.insert(key.to_owned(), value);
    inner.writes += 1;
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), MemoryStoreError> {
    let mut inner = self.lock();
    if inner.fail_writes {
      return Err(MemoryStoreError::WriteRejected(key.to_owned()));
    }
    inner.entries.remove(key);
    inner.writes += 1;
    Ok(())
  }
}
