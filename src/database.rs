use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::storage::Storage;

/// SQLite-backed key/value storage.
pub struct Database {
    conn: Connection,
}

pub fn default_db_path() -> PathBuf {
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home_dir).join(".keeper.db")
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        log::debug!("Opened database at {}", path.display());
        Ok(Database { conn })
    }

    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT updated_at FROM storage WHERE key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl Storage for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            [key, value],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM storage", [])?;
        log::info!("Cleared {} stored entries", removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_theme, load_todos, save_theme, save_todos, TODOS_KEY};
    use crate::models::{default_todos, Theme, Todo};

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("nested").join("keeper.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let (_dir, db) = temp_db();
        assert_eq!(db.get("nope").unwrap(), None);
        assert_eq!(db.updated_at("nope").unwrap(), None);
    }

    #[test]
    fn set_overwrites_existing_value() {
        let (_dir, mut db) = temp_db();
        db.set("k", "one").unwrap();
        db.set("k", "two").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("two"));
        assert!(db.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn state_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.db");
        let todos = vec![Todo::new(10, "Buy milk", false), Todo::new(4, "Pay rent", true)];

        {
            let mut db = Database::open(&path).unwrap();
            save_todos(&mut db, &todos).unwrap();
            save_theme(&mut db, Theme::Dark).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(load_todos(&db), todos);
        assert_eq!(load_theme(&db), Theme::Dark);
    }

    #[test]
    fn clear_restores_defaults_on_next_load() {
        let (_dir, mut db) = temp_db();
        db.set(TODOS_KEY, "[]").unwrap();
        save_theme(&mut db, Theme::Dark).unwrap();
        db.clear().unwrap();
        assert_eq!(load_todos(&db), default_todos());
        assert_eq!(load_theme(&db), Theme::Light);
    }
}
