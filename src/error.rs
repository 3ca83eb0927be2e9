//! Error types for site access and the durable store

use thiserror::Error;

/// Failure while reading a file from the static site
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("HTTP {status} fetching {path}")]
    Status { path: String, status: u16 },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SiteError {
    /// True for the "file simply isn't there" family of failures
    pub fn is_missing(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Status { status, .. } => *status == 404,
            _ => false,
        }
    }
}

/// Failure while reading or writing the durable key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable")]
    Unavailable,
}
