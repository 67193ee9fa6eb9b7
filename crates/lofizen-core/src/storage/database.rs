//! SQLite-backed key-value store.
//!
//! One table holds every partitioned record as serde-JSON keyed by
//! `(partition, id)`; a second table holds singleton state such as the
//! live timer snapshot. This mirrors the browser original, where each
//! IndexedDB object store was a bag of JSON objects.

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::StorageError;

use super::{data_dir, Partition};

/// SQLite database implementing the persistence adapter contract:
/// upsert, delete-by-key, list-all, and clear-by-partition.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/lofizen/lofizen.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(format!("data dir: {e}")))?
            .join("lofizen.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS records (
                    partition TEXT NOT NULL,
                    id        TEXT NOT NULL,
                    value     TEXT NOT NULL,
                    PRIMARY KEY (partition, id)
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_records_partition ON records(partition);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Upsert a record into a partition.
    pub fn put<T: Serialize>(
        &self,
        partition: Partition,
        id: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO records (partition, id, value) VALUES (?1, ?2, ?3)",
            params![partition.as_str(), id, json],
        )?;
        Ok(())
    }

    /// List all records in a partition.
    pub fn get_all<T: DeserializeOwned>(&self, partition: Partition) -> Result<Vec<T>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM records WHERE partition = ?1")?;
        let rows = stmt.query_map(params![partition.as_str()], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_str(&row?)?);
        }
        Ok(out)
    }

    /// Fetch one record by id.
    pub fn get<T: DeserializeOwned>(
        &self,
        partition: Partition,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM records WHERE partition = ?1 AND id = ?2")?;
        let result = stmt.query_row(params![partition.as_str(), id], |row| {
            row.get::<_, String>(0)
        });
        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete one record by id. Deleting a missing id is not an error.
    pub fn delete(&self, partition: Partition, id: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM records WHERE partition = ?1 AND id = ?2",
            params![partition.as_str(), id],
        )?;
        Ok(())
    }

    /// Remove every record in a partition.
    pub fn clear(&self, partition: Partition) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM records WHERE partition = ?1",
            params![partition.as_str()],
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a kv entry.
    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: String,
        n: u64,
    }

    #[test]
    fn put_get_all_delete_clear() {
        let db = Database::open_memory().unwrap();
        let a = Sample { id: "a".into(), n: 1 };
        let b = Sample { id: "b".into(), n: 2 };
        db.put(Partition::Todo, &a.id, &a).unwrap();
        db.put(Partition::Todo, &b.id, &b).unwrap();

        let mut all: Vec<Sample> = db.get_all(Partition::Todo).unwrap();
        all.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(all, vec![a.clone(), b.clone()]);

        db.delete(Partition::Todo, "a").unwrap();
        let all: Vec<Sample> = db.get_all(Partition::Todo).unwrap();
        assert_eq!(all, vec![b]);

        db.clear(Partition::Todo).unwrap();
        let all: Vec<Sample> = db.get_all(Partition::Todo).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn partitions_are_isolated() {
        let db = Database::open_memory().unwrap();
        let a = Sample { id: "a".into(), n: 1 };
        db.put(Partition::Todo, "a", &a).unwrap();
        db.clear(Partition::Video).unwrap();
        let all: Vec<Sample> = db.get_all(Partition::Todo).unwrap();
        assert_eq!(all.len(), 1);
        let none: Vec<Sample> = db.get_all(Partition::Video).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn upsert_replaces() {
        let db = Database::open_memory().unwrap();
        db.put(Partition::Settings, "s", &Sample { id: "s".into(), n: 1 })
            .unwrap();
        db.put(Partition::Settings, "s", &Sample { id: "s".into(), n: 2 })
            .unwrap();
        let got: Option<Sample> = db.get(Partition::Settings, "s").unwrap();
        assert_eq!(got.unwrap().n, 2);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }
}
