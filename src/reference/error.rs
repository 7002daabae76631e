use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("no ephemeris file in {0}")]
    NoEphemeris(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
