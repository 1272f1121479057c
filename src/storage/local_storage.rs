use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use super::database::Database;

/// String key-value store backed by a single SQLite table.
pub struct LocalStorage {
    db: Database,
}

impl LocalStorage {
    /// Open local storage at a file path
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let storage = Self {
            db: Database::new(path)?,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Volatile storage, gone when dropped
    pub fn in_memory() -> SqlResult<Self> {
        let storage = Self {
            db: Database::in_memory()?,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.db.connection().execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> SqlResult<Option<String>> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Insert or overwrite a value
    pub fn set_item(&self, key: &str, value: &str) -> SqlResult<()> {
        self.db.connection().execute(
            "INSERT OR REPLACE INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> SqlResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Remove every key
    pub fn clear(&self) -> SqlResult<()> {
        self.db.connection().execute("DELETE FROM local_storage", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_overwrite_remove() {
        let storage = LocalStorage::in_memory().unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "one").unwrap();
        storage.set_item("k", "two").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("two"));

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn clear_drops_all_keys() {
        let storage = LocalStorage::in_memory().unwrap();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.get_item("a").unwrap(), None);
        assert_eq!(storage.get_item("b").unwrap(), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let path = std::env::temp_dir()
            .join(format!("rust_chatroom_{}", uuid::Uuid::new_v4()))
            .join("client.db");
        {
            let storage = LocalStorage::with_path(&path).unwrap();
            storage.set_item("darkMode", "true").unwrap();
        }
        let storage = LocalStorage::with_path(&path).unwrap();
        assert_eq!(storage.get_item("darkMode").unwrap().as_deref(), Some("true"));
    }
}
