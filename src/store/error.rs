use thiserror::Error;

use super::Collection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection {0} does not exist")]
    MissingCollection(Collection),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
