use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid storage key \"{0}\": use only [A-Za-z0-9_-]")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}
