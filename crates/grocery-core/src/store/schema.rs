//! SQLite schema for the key-value store

/// Schema version for migrations
pub const SCHEMA_VERSION: u32 = 1;

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Get the complete schema SQL
    pub fn create_tables() -> &'static str {
        r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Grouped key-value records, values are JSON documents
CREATE TABLE IF NOT EXISTS kv_entries (
    grp TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (grp, key)
);
"#
    }

    /// Get migration SQL between two adjacent versions
    ///
    /// Version 1 is the first schema, so there is nothing to migrate yet.
    pub fn migration(_from: u32, _to: u32) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mentions_tables() {
        let sql = Schema::create_tables();
        assert!(sql.contains("schema_version"));
        assert!(sql.contains("kv_entries"));
    }

    #[test]
    fn test_no_migrations_for_first_version() {
        assert!(Schema::migration(0, SCHEMA_VERSION).is_none());
    }
}
