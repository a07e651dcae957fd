//! Key-value storage for grocery records
//!
//! Records are JSON values addressed by a `(group, key)` pair. Groups are
//! read back in bulk; keys are unique within a group.

mod memory;
mod schema;
#[cfg(feature = "sqlite")]
mod sqlite;

use serde_json::Value;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use schema::{Schema, SCHEMA_VERSION};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for key-value storage backends
///
/// Each call is atomic with respect to other calls on the same store.
pub trait KeyValueStore: Send + Sync {
    /// Write a value, replacing whatever was stored under the key
    fn set(&self, group: &str, key: &str, value: Value) -> StoreResult<()>;

    /// Read a single value
    fn get(&self, group: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Remove a value. Returns whether a value was present.
    fn delete(&self, group: &str, key: &str) -> StoreResult<bool>;

    /// All values in a group, in ascending key order
    fn get_group(&self, group: &str) -> StoreResult<Vec<Value>>;

    /// Remove `from_key` and write `value` under `to_key` in one step
    fn rename(&self, group: &str, from_key: &str, to_key: &str, value: Value)
        -> StoreResult<()>;

    /// Short backend name for diagnostics
    fn backend(&self) -> &'static str;
}
