//! Storage error types
//!
//! These errors stay inside the storage layer: the document service
//! converts them to boolean / `Option` results at its boundary.

use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    /// Serializing or deserializing a document failed
    Serialization(String),
    /// Local cache read/write failed
    Io(String),
    /// Remote store request failed (network error, non-2xx, bad body)
    Remote(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::Io(msg) => write!(f, "Local storage error: {}", msg),
            StorageError::Remote(msg) => write!(f, "Remote store error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Remote(e.to_string())
    }
}
