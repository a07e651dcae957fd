//! Grocery Core - item model and storage for the grocery list service
//!
//! - **Item**: the `GroceryItem` record and its validation rules
//! - **Store**: grouped key-value storage with in-memory and SQLite backends
//! - **List**: the add/delete/update/rename/list operations over a store
//! - **Event**: change notifications published on every mutation
//! - **Config**: server, storage and event settings loaded from TOML and the environment
//!
//! # Storage layout
//!
//! ```text
//! group "grocery-list"
//!   grocery-list:item:<name>  ->  {"name": ..., "quantity": ..., "status"?: ...}
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod list;
pub mod store;

pub use config::{
    ConfigError, EventConfig, GroceryConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use error::{GroceryError, Result, StoreError, ValidationError};
pub use event::{EventSink, ItemEvent, ItemEventKind, MemorySink, NoopSink, TracingSink};
pub use item::{item_key, GroceryItem, GROUP, KEY_PREFIX};
pub use list::GroceryList;
pub use store::{KeyValueStore, MemoryStore};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
