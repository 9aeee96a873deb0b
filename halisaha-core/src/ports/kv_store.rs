//! Key-value store port - durable local storage abstraction

use crate::domain::result::Result;

/// Durable string-keyed storage for JSON documents
///
/// Each persisted entry (user directory, reservation map, display settings,
/// session) is one key. Values are serialized JSON text; the store does not
/// interpret them.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw JSON stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, sorted
    fn keys(&self) -> Result<Vec<String>>;
}
