use anyhow::Result;

use crate::models::{default_todos, Theme, Todo};

pub const TODOS_KEY: &str = "keeper-todos";
pub const THEME_KEY: &str = "keeper-theme";

/// String key/value storage the store persists into.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

pub fn load_todos<S: Storage>(storage: &S) -> Vec<Todo> {
    let raw = match storage.get(TODOS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default_todos(),
        Err(e) => {
            log::warn!("Could not read {}: {:#}", TODOS_KEY, e);
            return default_todos();
        }
    };

    match serde_json::from_str::<Vec<Todo>>(&raw) {
        Ok(todos) => dedup_ids(drop_blank(todos)),
        Err(e) => {
            log::warn!("Discarding malformed {}: {}", TODOS_KEY, e);
            default_todos()
        }
    }
}

pub fn load_theme<S: Storage>(storage: &S) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring stored theme: {:#}", e);
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            log::warn!("Could not read {}: {:#}", THEME_KEY, e);
            Theme::default()
        }
    }
}

pub fn save_todos<S: Storage>(storage: &mut S, todos: &[Todo]) -> Result<()> {
    let json = serde_json::to_string(todos)?;
    storage.set(TODOS_KEY, &json)
}

pub fn save_theme<S: Storage>(storage: &mut S, theme: Theme) -> Result<()> {
    storage.set(THEME_KEY, theme.as_str())
}

fn drop_blank(todos: Vec<Todo>) -> Vec<Todo> {
    let before = todos.len();
    let kept: Vec<Todo> = todos
        .into_iter()
        .filter(|todo| !todo.text.trim().is_empty())
        .collect();
    if kept.len() != before {
        log::warn!("Dropped {} todos with blank text", before - kept.len());
    }
    kept
}

// Later records with an id already seen are dropped.
fn dedup_ids(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen = std::collections::HashSet::new();
    let before = todos.len();
    let kept: Vec<Todo> = todos.into_iter().filter(|todo| seen.insert(todo.id)).collect();
    if kept.len() != before {
        log::warn!("Dropped {} todos with duplicate ids", before - kept.len());
    }
    kept
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use anyhow::{bail, Result};

    use super::Storage;

    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        pub entries: HashMap<String, String>,
        pub writes: usize,
        pub fail_writes: bool,
    }

    impl Storage for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                bail!("storage is read-only");
            }
            self.writes += 1;
            self.entries.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            self.entries.clear();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStorage;
    use super::*;

    #[test]
    fn missing_entries_fall_back_to_defaults() {
        let storage = MemoryStorage::default();
        assert_eq!(load_todos(&storage), default_todos());
        assert_eq!(load_theme(&storage), Theme::Light);
    }

    #[test]
    fn malformed_todos_fall_back_to_seed() {
        let mut storage = MemoryStorage::default();
        storage.set(TODOS_KEY, "{not json").unwrap();
        assert_eq!(load_todos(&storage), default_todos());

        storage.set(TODOS_KEY, r#"[{"id":1}]"#).unwrap();
        assert_eq!(load_todos(&storage), default_todos());
    }

    #[test]
    fn empty_array_is_kept() {
        let mut storage = MemoryStorage::default();
        storage.set(TODOS_KEY, "[]").unwrap();
        assert!(load_todos(&storage).is_empty());
    }

    #[test]
    fn unknown_theme_defaults_to_light() {
        let mut storage = MemoryStorage::default();
        storage.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&storage), Theme::Light);

        storage.set(THEME_KEY, "dark").unwrap();
        assert_eq!(load_theme(&storage), Theme::Dark);
    }

    #[test]
    fn todos_survive_a_save_and_reload() {
        let todos = vec![
            Todo::new(1_700_000_000_000, "Buy milk", false),
            Todo::new(5, "Call \"mom\"", true),
            Todo::new(2, "Écrire", false),
        ];
        let mut storage = MemoryStorage::default();
        save_todos(&mut storage, &todos).unwrap();
        assert_eq!(load_todos(&storage), todos);
    }

    #[test]
    fn blank_records_are_dropped_on_load() {
        let mut storage = MemoryStorage::default();
        storage
            .set(
                TODOS_KEY,
                r#"[{"id":1,"text":"   ","completed":false},{"id":2,"text":"keep","completed":false},{"id":3,"text":"","completed":true}]"#,
            )
            .unwrap();
        assert_eq!(load_todos(&storage), vec![Todo::new(2, "keep", false)]);
    }

    #[test]
    fn duplicate_ids_are_dropped_on_load() {
        let mut storage = MemoryStorage::default();
        storage
            .set(
                TODOS_KEY,
                r#"[{"id":1,"text":"a","completed":false},{"id":1,"text":"b","completed":true}]"#,
            )
            .unwrap();
        assert_eq!(load_todos(&storage), vec![Todo::new(1, "a", false)]);
    }
}
