use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropagationError {
    #[error("invalid element set for {satellite}: {message}")]
    InvalidElements { satellite: String, message: String },
    #[error("propagation failed for {satellite}: {message}")]
    Propagation { satellite: String, message: String },
    #[error("non-finite state for {0}")]
    NonFinite(String),
    #[error("propagation of {0} timed out")]
    Timeout(String),
    #[error("earlier propagation of {0} is still running")]
    StillRunning(String),
    #[error("propagation task for {satellite} failed: {message}")]
    Task { satellite: String, message: String },
}
