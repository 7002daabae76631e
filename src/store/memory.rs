use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use super::{Batch, BatchOp, Collection, ForEachFn, Store, StoreError, UpdateFn};

type Entries = Arc<RwLock<BTreeMap<String, Arc<[u8]>>>>;

/// In-process store. Values are shared immutable buffers swapped whole on
/// write, and iteration works on a snapshot so it never holds the lock while
/// calling back into user code.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Entries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, collection: Collection) -> Result<Entries, StoreError> {
        self.collections
            .read()
            .unwrap()
            .get(&collection)
            .cloned()
            .ok_or(StoreError::MissingCollection(collection))
    }
}

impl Store for MemoryStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut collections = self.collections.write().unwrap();
        for collection in Collection::ALL {
            collections.entry(collection).or_default();
        }
        Ok(())
    }

    fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries(collection)?;
        let locked = entries.read().unwrap();
        Ok(locked.get(key).map(|value| value.to_vec()))
    }

    fn put(&self, collection: Collection, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let entries = self.entries(collection)?;
        let value: Arc<[u8]> = Arc::from(value);
        entries.write().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn for_each(&self, collection: Collection, f: &mut ForEachFn<'_>) -> Result<(), StoreError> {
        let snapshot: Vec<(String, Arc<[u8]>)> = {
            let entries = self.entries(collection)?;
            let locked = entries.read().unwrap();
            locked
                .iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v)))
                .collect()
        };

        for (key, value) in &snapshot {
            f(key, value)?;
        }
        Ok(())
    }

    fn update(&self, collection: Collection, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        let entries = self.entries(collection)?;
        let mut batch = Batch::default();
        f(&mut batch)?;

        let mut locked = entries.write().unwrap();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put(key, value) => {
                    locked.insert(key, Arc::from(value));
                }
                BatchOp::Delete(key) => {
                    locked.remove(&key);
                }
            }
        }
        Ok(())
    }
}
