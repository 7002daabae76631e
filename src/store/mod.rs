mod directory;
mod error;
mod memory;

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};

pub use directory::DirectoryStore;
pub use error::StoreError;
pub use memory::MemoryStore;

/// Named collections the engine reads and writes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Collection {
    Targets,
    Zones,
    Catseyes,
    Fleet,
    SatPos,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Targets,
        Collection::Zones,
        Collection::Catseyes,
        Collection::Fleet,
        Collection::SatPos,
    ];

    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    Put(String, Vec<u8>),
    Delete(String),
}

/// Writes staged inside [`Store::update`], applied together or not at all.
#[derive(Debug, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.ops.push(BatchOp::Put(key.into(), value));
    }

    pub fn delete(&mut self, key: impl Into<String>) {
        self.ops.push(BatchOp::Delete(key.into()));
    }

    pub(crate) fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

pub type ForEachFn<'a> = dyn FnMut(&str, &[u8]) -> Result<(), StoreError> + 'a;
pub type UpdateFn<'a> = dyn FnMut(&mut Batch) -> Result<(), StoreError> + 'a;

/// Key/value storage over named collections.
///
/// A single-key write replaces the whole value, so concurrent readers see
/// either the previous record or the new one.
pub trait Store: Send + Sync {
    /// Creates every [`Collection`] that does not exist yet.
    fn ensure_schema(&self) -> Result<(), StoreError>;

    fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&self, collection: Collection, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Visits entries in key order. Stops at the first error returned by `f`.
    fn for_each(&self, collection: Collection, f: &mut ForEachFn<'_>) -> Result<(), StoreError>;

    fn update(&self, collection: Collection, f: &mut UpdateFn<'_>) -> Result<(), StoreError>;
}

pub fn put_json<T: Serialize>(
    store: &dyn Store,
    collection: Collection,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    store.put(collection, key, &bytes)
}

pub fn get_json<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    key: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(collection, key)?
        .map(|bytes| serde_json::from_slice(&bytes))
        .transpose()
        .map_err(StoreError::from)
}

/// Decodes every entry of a collection, in key order.
pub fn load_all<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
) -> Result<Vec<(String, T)>, StoreError> {
    let mut items = Vec::new();
    store.for_each(collection, &mut |key, bytes| {
        items.push((key.to_string(), serde_json::from_slice(bytes)?));
        Ok(())
    })?;
    Ok(items)
}

/// Makes `items` the whole content of `collection` in one batch. Keys not
/// among `items` are deleted. A key given twice keeps its last value.
pub fn replace_all_json<'a, T, I>(
    store: &dyn Store,
    collection: Collection,
    items: I,
) -> Result<usize, StoreError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    let encoded = items
        .into_iter()
        .map(|(key, value)| Ok((key.to_string(), serde_json::to_vec(value)?)))
        .collect::<Result<BTreeMap<_, _>, StoreError>>()?;

    let mut stale = Vec::new();
    store.for_each(collection, &mut |key, _| {
        if !encoded.contains_key(key) {
            stale.push(key.to_string());
        }
        Ok(())
    })?;

    let count = encoded.len();
    let mut pending = Some((stale, encoded));
    store.update(collection, &mut |batch| {
        if let Some((stale, encoded)) = pending.take() {
            for key in stale {
                batch.delete(key);
            }
            for (key, bytes) in encoded {
                batch.put(key, bytes);
            }
        }
        Ok(())
    })?;
    Ok(count)
}
