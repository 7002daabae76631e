use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Batch, BatchOp, Collection, ForEachFn, Store, StoreError, UpdateFn};

const EXTENSION: &str = "json";

/// Store laid out as one folder per collection and one `<key>.json` file per
/// record. Records are written to a hidden temporary file and renamed into
/// place, so a reader sees either the old or the new file.
///
/// `update` stages the whole batch before moving anything, then renames one
/// file at a time. A concurrent reader can observe part of a batch. If a
/// rename fails, records already moved stay and the rest of the batch is
/// discarded.
pub struct DirectoryStore {
    base: PathBuf,
    sequence: AtomicU64,
}

impl DirectoryStore {
    pub fn new(base: PathBuf) -> Self {
        DirectoryStore {
            base,
            sequence: AtomicU64::new(0),
        }
    }

    fn collection_path(&self, collection: Collection) -> Result<PathBuf, StoreError> {
        let path = self.base.join(collection.name());
        if path.is_dir() {
            Ok(path)
        } else {
            Err(StoreError::MissingCollection(collection))
        }
    }

    fn record_path(&self, collection: Collection, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self
            .collection_path(collection)?
            .join(format!("{}.{}", key, EXTENSION)))
    }

    fn temp_path(&self, collection: Collection, key: &str) -> Result<PathBuf, StoreError> {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .collection_path(collection)?
            .join(format!(".{}.{}.{}", key, std::process::id(), n)))
    }

    fn stage(&self, collection: Collection, key: &str, value: &[u8]) -> Result<PathBuf, StoreError> {
        let temp = self.temp_path(collection, key)?;
        fs::write(&temp, value)?;
        Ok(temp)
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let invalid = key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0']);
    if invalid {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

impl Store for DirectoryStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            fs::create_dir_all(self.base.join(collection.name()))?;
        }
        Ok(())
    }

    fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.record_path(collection, key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, collection: Collection, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.record_path(collection, key)?;
        let temp = self.stage(collection, key, value)?;
        fs::rename(temp, path)?;
        Ok(())
    }

    fn for_each(&self, collection: Collection, f: &mut ForEachFn<'_>) -> Result<(), StoreError> {
        let path = self.collection_path(collection)?;

        let mut keys = Vec::new();
        for entry in path.read_dir()? {
            let entry_path = entry?.path();
            if !entry_path.is_file()
                || entry_path.extension().and_then(|e| e.to_str()) != Some(EXTENSION)
            {
                continue;
            }
            let Some(key) = entry_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if key.starts_with('.') {
                continue;
            }
            keys.push(key.to_string());
        }
        keys.sort();

        for key in keys {
            // Deleted between listing and reading.
            let Some(bytes) = self.get(collection, &key)? else {
                continue;
            };
            f(&key, &bytes)?;
        }
        Ok(())
    }

    fn update(&self, collection: Collection, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        self.collection_path(collection)?;
        let mut batch = Batch::default();
        f(&mut batch)?;

        let ops = batch.into_ops();
        let mut staged = Vec::with_capacity(ops.len());
        for op in &ops {
            let result = match op {
                BatchOp::Put(key, value) => self
                    .record_path(collection, key)
                    .and_then(|path| Ok((Some(self.stage(collection, key, value)?), path))),
                BatchOp::Delete(key) => self.record_path(collection, key).map(|path| (None, path)),
            };
            match result {
                Ok(entry) => staged.push(entry),
                Err(e) => {
                    for temp in staged.into_iter().filter_map(|(temp, _)| temp) {
                        let _ = fs::remove_file(temp);
                    }
                    return Err(e);
                }
            }
        }

        let mut pending = staged.into_iter();
        while let Some((temp, path)) = pending.next() {
            if let Err(e) = commit(temp, &path) {
                for temp in pending.filter_map(|(temp, _)| temp) {
                    let _ = fs::remove_file(temp);
                }
                return Err(e.into());
            }
        }
        Ok(())
    }
}

fn commit(temp: Option<PathBuf>, path: &Path) -> std::io::Result<()> {
    match temp {
        Some(temp) => fs::rename(&temp, path).inspect_err(|_| {
            let _ = fs::remove_file(&temp);
        }),
        None => match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directory_store_contract() {
        let dir = TempDir::new().unwrap();
        crate::store::tests::exercise_store(&DirectoryStore::new(dir.path().join("db")));
    }

    #[test]
    fn records_are_plain_files() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path().to_path_buf());
        store.ensure_schema().unwrap();
        store.put(Collection::Fleet, "M001", b"{}").unwrap();

        let file = dir.path().join("FLEET").join("M001.json");
        assert_eq!(fs::read(file).unwrap(), b"{}");

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("FLEET"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_rename_discards_the_rest_of_the_batch() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path().to_path_buf());
        store.ensure_schema().unwrap();
        let blocker = dir.path().join("FLEET").join("M002.json");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), b"").unwrap();

        let result = store.update(Collection::Fleet, &mut |batch| {
            batch.put("M001", b"{}".to_vec());
            batch.put("M002", b"{}".to_vec());
            batch.put("M003", b"{}".to_vec());
            Ok(())
        });
        assert!(matches!(result, Err(StoreError::Io(_))));

        assert!(store.get(Collection::Fleet, "M001").unwrap().is_some());
        assert!(store.get(Collection::Fleet, "M003").unwrap().is_none());
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("FLEET"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn timestamp_keys_are_accepted() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path().to_path_buf());
        store.ensure_schema().unwrap();
        store
            .put(Collection::Targets, "2024-01-01T00:00:00Z", b"[]")
            .unwrap();
        assert!(store
            .get(Collection::Targets, "2024-01-01T00:00:00Z")
            .unwrap()
            .is_some());
    }

    #[test]
    fn keys_cannot_escape_the_collection() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path().to_path_buf());
        store.ensure_schema().unwrap();
        for key in ["../ZONES/x", ".hidden", "", "a/b"] {
            assert!(matches!(
                store.put(Collection::SatPos, key, b"{}"),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }
}
