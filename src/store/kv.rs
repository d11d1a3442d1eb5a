use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// SQLite-backed key-value store with JSON values.
///
/// The prompt library only needs get/set semantics over a handful of keys
/// (`prompts`, `backups`), so the schema is a single table.
#[derive(Clone)]
pub struct KvStore {
    conn: Arc<Mutex<Connection>>,
}

impl KvStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value.to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_key() {
        let store = KvStore::open_in_memory().unwrap();
        assert_eq!(store.get("prompts").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let store = KvStore::open_in_memory().unwrap();
        let value = json!([{"id": "prompt_1_a", "label": "greeting"}]);
        store.set("prompts", &value).unwrap();
        assert_eq!(store.get("prompts").unwrap(), Some(value));
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let store = KvStore::open_in_memory().unwrap();
        store.set("prompts", &json!([1])).unwrap();
        store.set("prompts", &json!([1, 2])).unwrap();
        assert_eq!(store.get("prompts").unwrap(), Some(json!([1, 2])));
    }
}
