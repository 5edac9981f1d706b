//! SQLite-backed key/value store.
//!
//! Holds the streak fields as text rows in a single `kv` table. Keys are
//! namespaced (`ministreak.currentStreak`), so the same file can host other
//! groups without collisions.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::kv::{scoped_key, KeyValueStore, NAMESPACE};
use crate::error::StorageError;

/// SQLite database for streak persistence.
pub struct Database {
    conn: Connection,
    namespace: String,
}

impl Database {
    /// Open the database at `<data dir>/ministreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("ministreak.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let db = Self {
            conn,
            namespace: NAMESPACE.to_string(),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Scope subsequent reads and writes to another namespace.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a raw value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
    }

    /// Set a raw value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        let scoped = scoped_key(&self.namespace, key);
        match self.kv_get(&scoped) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %scoped, error = %e, "kv read failed, using default");
                None
            }
        }
    }
}

impl KeyValueStore for Database {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.read(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        self.read(key).unwrap_or_else(|| default.to_string())
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError> {
        self.kv_set(&scoped_key(&self.namespace, key), &value.to_string())?;
        Ok(())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.kv_set(&scoped_key(&self.namespace, key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn typed_access_is_namespaced() {
        let db = Database::open_memory().unwrap();
        db.set_int("currentStreak", 3).unwrap();
        db.set_string("lastSeenDateUTC", "2025-02-01").unwrap();

        assert_eq!(db.get_int("currentStreak", 0), 3);
        assert_eq!(db.get_string("lastSeenDateUTC", ""), "2025-02-01");
        assert_eq!(
            db.kv_get("ministreak.currentStreak").unwrap().as_deref(),
            Some("3")
        );
    }

    #[test]
    fn namespaces_do_not_collide() {
        let db = Database::open_memory().unwrap().with_namespace("other");
        db.set_int("currentStreak", 9).unwrap();
        assert!(db.kv_get("ministreak.currentStreak").unwrap().is_none());
        assert_eq!(db.get_int("currentStreak", 0), 9);
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("streak.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set_int("bestStreak", 40).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get_int("bestStreak", 0), 40);
    }
}
