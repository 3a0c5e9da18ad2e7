//! Storage backend trait definition.
//!
//! Keys are full object paths (`organizations/{org}/icons/...`); the
//! pipeline computes them deterministically, so the store never needs a
//! manifest to find what it wrote.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    /// Object not found
    NotFound(String),
    /// IO error
    Io(std::io::Error),
    /// Other error
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(key) => write!(f, "object not found: {}", key),
            StorageError::Io(e) => write!(f, "io error: {}", e),
            StorageError::Other(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Pluggable object store with upsert semantics.
///
/// `put` overwrites in place: generation is idempotent because every key is
/// a pure function of the organization and artifact dimensions. `delete` of
/// a missing key succeeds, which is what makes the delete path best-effort.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get an object by key
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object, overwriting any existing object at the same key
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete an object; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// List all keys under a prefix
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
