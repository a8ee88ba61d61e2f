use std::collections::HashMap;
use std::sync::RwLock;

use vintrade_core::ExpectedVersion;

use super::{BlobStore, BlobWrite, StoreError, Versioned, check_batch, check_expected, validate_key};

/// In-memory blob store. Batches are applied atomically.
///
/// Intended for tests/dev and for running without a data directory.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Versioned>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError> {
        validate_key(key)?;
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn commit(&self, writes: Vec<BlobWrite>) -> Result<Vec<u64>, StoreError> {
        check_batch(&writes)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        for w in &writes {
            check_expected(&w.key, w.expected, blobs.get(&w.key).map(|b| b.version))?;
        }

        let mut versions = Vec::with_capacity(writes.len());
        for w in writes {
            let version = blobs.get(&w.key).map(|b| b.version).unwrap_or(0) + 1;
            blobs.insert(
                w.key,
                Versioned {
                    version,
                    value: w.value,
                },
            );
            versions.push(version);
        }
        Ok(versions)
    }

    fn delete(&self, key: &str, expected: ExpectedVersion) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        check_expected(key, expected, blobs.get(key).map(|b| b.version))?;
        blobs.remove(key);
        Ok(())
    }
}
