//! SQLite-backed key-value store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde_json::Value;

use super::schema::{Schema, SCHEMA_VERSION};
use super::{KeyValueStore, StoreResult};
use crate::error::StoreError;

/// Durable store keeping each record as a JSON document in one row
pub struct SqliteStore {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = rusqlite::Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: rusqlite::Connection) -> StoreResult<Self> {
        initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, rusqlite::Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

/// Create tables on a fresh database, migrate an older one, refuse a newer one
fn initialize(conn: &rusqlite::Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = get_schema_version(conn).unwrap_or(0);

    if current_version == 0 {
        conn.execute_batch(Schema::create_tables())?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        for version in current_version..SCHEMA_VERSION {
            if let Some(migration) = Schema::migration(version, version + 1) {
                conn.execute_batch(migration)?;
            }
        }
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(StoreError::SchemaVersionMismatch {
            expected: SCHEMA_VERSION,
            actual: current_version,
        });
    }

    Ok(())
}

fn get_schema_version(conn: &rusqlite::Connection) -> Option<u32> {
    conn.query_row(
        "SELECT version FROM schema_version ORDER BY rowid DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .ok()
}

fn set_schema_version(conn: &rusqlite::Connection, version: u32) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn upsert(conn: &rusqlite::Connection, group: &str, key: &str, value: &Value) -> StoreResult<()> {
    let json = serde_json::to_string(value)?;
    conn.execute(
        "INSERT OR REPLACE INTO kv_entries (grp, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![group, key, json, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn set(&self, group: &str, key: &str, value: Value) -> StoreResult<()> {
        let conn = self.lock()?;
        upsert(&conn, group, key, &value)?;
        tracing::debug!(group, key, "stored record");
        Ok(())
    }

    fn get(&self, group: &str, key: &str) -> StoreResult<Option<Value>> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT value FROM kv_entries WHERE grp = ?1 AND key = ?2",
            [group, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, group: &str, key: &str) -> StoreResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM kv_entries WHERE grp = ?1 AND key = ?2",
            [group, key],
        )?;
        tracing::debug!(group, key, removed, "deleted record");
        Ok(removed > 0)
    }

    fn get_group(&self, group: &str) -> StoreResult<Vec<Value>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM kv_entries WHERE grp = ?1 ORDER BY key")?;

        let rows = stmt
            .query_map([group], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    fn rename(
        &self,
        group: &str,
        from_key: &str,
        to_key: &str,
        value: Value,
    ) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM kv_entries WHERE grp = ?1 AND key = ?2",
            [group, from_key],
        )?;
        upsert(&tx, group, to_key, &value)?;
        tx.commit()?;
        tracing::debug!(group, from_key, to_key, "renamed record");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
