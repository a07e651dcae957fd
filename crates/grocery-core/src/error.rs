//! Error types for grocery-core

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for grocery operations
pub type Result<T> = std::result::Result<T, GroceryError>;

/// Main error type for grocery operations
#[derive(Error, Debug)]
pub enum GroceryError {
    /// Request input failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage backend failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// A field-level validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable explanation
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Lock poisoned: {0}")]
    Lock(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    SchemaVersionMismatch { expected: u32, actual: u32 },
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for GroceryError {
    fn from(err: serde_json::Error) -> Self {
        GroceryError::Store(StoreError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_error_is_store_serialization() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert!(matches!(
            GroceryError::from(err),
            GroceryError::Store(StoreError::Serialization(_))
        ));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_database_error_reaches_grocery_error_through_store() {
        let err = GroceryError::from(StoreError::from(rusqlite::Error::QueryReturnedNoRows));
        assert!(matches!(err, GroceryError::Store(StoreError::Database(_))));
    }
}
