//! Errors raised while loading documents
//!
//! The costing engine itself cannot fail; only reading input documents can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to read a document from disk
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON or has the wrong shape
    #[error("Malformed document '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Quantity pattern failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory traversal failed
    #[error("Failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
