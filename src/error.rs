use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures at the I/O edges. The generator and the matcher never fail.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Failed to read catalog from {path}: {source}")]
    CatalogRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("Failed to read store from {path}: {source}")]
    StoreRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse store {path}: {reason}")]
    StoreParse { path: PathBuf, reason: String },

    #[error("Failed to write store to {path}: {source}")]
    StoreWrite { path: PathBuf, source: io::Error },

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not found")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, RouterError>;
