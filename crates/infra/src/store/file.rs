use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use vintrade_core::ExpectedVersion;

use super::{BlobStore, BlobWrite, StoreError, Versioned, check_batch, check_expected, validate_key};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u64,
    value: JsonValue,
}

/// One `<key>.json` file per key under a data directory.
///
/// Writes go to a temp file that is renamed into place. A batch checks every
/// expectation before writing, but a crash between two renames can leave the
/// batch half applied.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBlobStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read(&self, key: &str) -> Result<Option<Envelope>, StoreError> {
        let path = self.path(key);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Serialization(format!("{}: {e}", path.display()))
        })?;
        Ok(Some(envelope))
    }

    fn write(&self, key: &str, envelope: &Envelope) -> Result<(), StoreError> {
        let target = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(envelope)?;

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &target)?;
        Ok(())
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError> {
        validate_key(key)?;
        Ok(self.read(key)?.map(|e| Versioned {
            version: e.version,
            value: e.value,
        }))
    }

    fn commit(&self, writes: Vec<BlobWrite>) -> Result<Vec<u64>, StoreError> {
        check_batch(&writes)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut current = Vec::with_capacity(writes.len());
        for w in &writes {
            let version = self.read(&w.key)?.map(|e| e.version);
            check_expected(&w.key, w.expected, version)?;
            current.push(version);
        }

        let mut versions = Vec::with_capacity(writes.len());
        for (w, version) in writes.into_iter().zip(current) {
            let next = version.unwrap_or(0) + 1;
            self.write(
                &w.key,
                &Envelope {
                    version: next,
                    value: w.value,
                },
            )?;
            versions.push(next);
        }
        Ok(versions)
    }

    fn delete(&self, key: &str, expected: ExpectedVersion) -> Result<(), StoreError> {
        validate_key(key)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        check_expected(key, expected, self.read(key)?.map(|e| e.version))?;
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileBlobStore::open(dir.path()).unwrap();
            store
                .commit(vec![
                    BlobWrite::new("catalog.active", ExpectedVersion::Absent, json!([{"a": 1}])),
                    BlobWrite::new("pricing.formulas", ExpectedVersion::Absent, json!({"v": 1})),
                ])
                .unwrap();
        }

        let store = FileBlobStore::open(dir.path()).unwrap();
        let active = store.get("catalog.active").unwrap().unwrap();
        assert_eq!(active.version, 1);
        assert_eq!(active.value, json!([{"a": 1}]));
        assert!(dir.path().join("pricing.formulas.json").exists());
    }

    #[test]
    fn stale_expectation_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();
        store
            .commit(vec![BlobWrite::new("a", ExpectedVersion::Absent, json!(1))])
            .unwrap();

        let err = store
            .commit(vec![
                BlobWrite::new("b", ExpectedVersion::Absent, json!(2)),
                BlobWrite::new("a", ExpectedVersion::Exact(9), json!(3)),
            ])
            .unwrap_err();

        assert!(matches!(err, StoreError::Concurrency(_)));
        assert!(store.get("b").unwrap().is_none());
        assert_eq!(store.get("a").unwrap().unwrap().value, json!(1));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), b"not json").unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();
        assert!(matches!(store.get("a"), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn delete_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();
        store
            .commit(vec![BlobWrite::new("a", ExpectedVersion::Any, json!(1))])
            .unwrap();
        store.delete("a", ExpectedVersion::Exact(1)).unwrap();
        assert!(!dir.path().join("a.json").exists());
        store.delete("a", ExpectedVersion::Any).unwrap();
    }
}
