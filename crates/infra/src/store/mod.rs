//! Versioned JSON blob storage.
//!
//! Each persisted collection (active catalog, archive, templates, orders,
//! special orders, formulas) is one JSON value under a fixed key. Every key
//! carries a revision that starts at 1 and increases by one per write, which
//! gives writers optimistic concurrency via `ExpectedVersion`.
//!
//! A `commit` writes a batch of keys. All expectations are checked before
//! anything is written.

mod file;
mod in_memory;

pub use file::FileBlobStore;
pub use in_memory::InMemoryBlobStore;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use vintrade_core::ExpectedVersion;

/// A stored value and its revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned {
    pub version: u64,
    pub value: JsonValue,
}

/// One write inside a `commit` batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobWrite {
    pub key: String,
    pub expected: ExpectedVersion,
    pub value: JsonValue,
}

impl BlobWrite {
    pub fn new(key: impl Into<String>, expected: ExpectedVersion, value: JsonValue) -> Self {
        Self {
            key: key.into(),
            expected,
            value,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage io failed: {0}")]
    Io(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        StoreError::Io(value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Serialization(value.to_string())
    }
}

pub trait BlobStore: Send + Sync {
    /// `None` when the key has never been written (or was deleted).
    fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError>;

    /// Apply a batch of writes. Returns the new revision of each key, in
    /// batch order. Fails without writing if any expectation does not hold.
    fn commit(&self, writes: Vec<BlobWrite>) -> Result<Vec<u64>, StoreError>;

    fn delete(&self, key: &str, expected: ExpectedVersion) -> Result<(), StoreError>;
}

impl<S> BlobStore for Arc<S>
where
    S: BlobStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError> {
        (**self).get(key)
    }

    fn commit(&self, writes: Vec<BlobWrite>) -> Result<Vec<u64>, StoreError> {
        (**self).commit(writes)
    }

    fn delete(&self, key: &str, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).delete(key, expected)
    }
}

/// Keys are file-name safe: lowercase ASCII, digits, `.`, `_` and `-`.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

pub(crate) fn check_expected(
    key: &str,
    expected: ExpectedVersion,
    current: Option<u64>,
) -> Result<(), StoreError> {
    if expected.matches(current) {
        Ok(())
    } else {
        Err(StoreError::Concurrency(format!(
            "{key}: expected {expected:?}, found {current:?}"
        )))
    }
}

/// A batch must not name the same key twice.
pub(crate) fn check_batch(writes: &[BlobWrite]) -> Result<(), StoreError> {
    for (idx, w) in writes.iter().enumerate() {
        validate_key(&w.key)?;
        if writes[..idx].iter().any(|other| other.key == w.key) {
            return Err(StoreError::InvalidKey(format!(
                "batch writes {} twice (index {idx})",
                w.key
            )));
        }
    }
    Ok(())
}
