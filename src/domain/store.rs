//! Storage trait definitions
//!
//! These traits define the contract for the two homes of a user document:
//! the synchronous local cache and the asynchronous remote store.
//! Implementations live in the infrastructure layer; the document service
//! composes them into the load/save sync policy.

use async_trait::async_trait;

use super::StorageError;
use crate::models::document::UserDocument;

/// Synchronous per-user document cache.
///
/// Reads and writes must not suspend: every mutation in the week API is a
/// read-modify-write against this cache, with the remote store trailing
/// behind on a best-effort basis.
pub trait LocalCache: Send + Sync {
    /// Fetch the cached document for a user, if any.
    fn get(&self, user_id: &str) -> Result<Option<UserDocument>, StorageError>;

    /// Store (or replace) the cached document for a user.
    fn put(&self, user_id: &str, document: &UserDocument) -> Result<(), StorageError>;

    /// Drop a user's cached document.
    fn remove(&self, user_id: &str) -> Result<(), StorageError>;
}

/// Asynchronous remote document store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the remote copy of a user's document. `Ok(None)` means the
    /// store answered and has no document for this user; `Err` means the
    /// store could not be reached or returned garbage.
    async fn fetch(&self, user_id: &str) -> Result<Option<UserDocument>, StorageError>;

    /// Overwrite the remote copy wholesale. No partial updates.
    async fn push(&self, user_id: &str, document: &UserDocument) -> Result<(), StorageError>;

    /// Remove the remote copy entirely.
    async fn delete(&self, user_id: &str) -> Result<(), StorageError>;
}
