use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::models::{Stats, Theme, Todo, TodoId};
use crate::storage::{self, Storage};

/// Owns the todo collection, theme and pending-delete stage.
///
/// Every command is total: invalid input is a silent no-op and the return
/// value only reports whether state changed. A successful change to the
/// collection or theme is written through to storage before returning.
pub struct TodoStore<S: Storage> {
    storage: S,
    todos: Vec<Todo>,
    theme: Theme,
    pending_delete: Option<TodoId>,
    last_id: TodoId,
}

/// Result of resolving a user-supplied selector against the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Exact(TodoId),
    Suggested(TodoId),
    NotFound,
}

impl<S: Storage> TodoStore<S> {
    pub fn load(storage: S) -> Self {
        let todos = storage::load_todos(&storage);
        let theme = storage::load_theme(&storage);
        log::debug!("Loaded {} todos, theme {}", todos.len(), theme);
        Self::with_state(storage, todos, theme)
    }

    pub fn with_state(storage: S, todos: Vec<Todo>, theme: Theme) -> Self {
        let last_id = todos.iter().map(|todo| todo.id).max().unwrap_or(0);
        TodoStore {
            storage,
            todos,
            theme,
            pending_delete: None,
            last_id,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pending_delete(&self) -> Option<TodoId> {
        self.pending_delete
    }

    pub fn stats(&self) -> Stats {
        Stats::of(&self.todos)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    pub fn add(&mut self, text: &str) -> Option<TodoId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let id = self.next_id();
        self.todos.push(Todo::new(id, text, false));
        self.persist_todos();
        Some(id)
    }

    pub fn toggle(&mut self, id: TodoId) -> bool {
        let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) else {
            return false;
        };
        todo.completed = !todo.completed;
        self.persist_todos();
        true
    }

    pub fn edit(&mut self, id: TodoId, new_text: &str) -> bool {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return false;
        }
        let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) else {
            return false;
        };
        if todo.text == new_text {
            return false;
        }
        todo.text = new_text.to_string();
        self.persist_todos();
        true
    }

    pub fn request_delete(&mut self, id: TodoId) {
        self.pending_delete = Some(id);
    }

    pub fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        if self.todos.len() == before {
            return false;
        }
        self.persist_todos();
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Moves `dragged_id` into the slot `target_id` occupied before the move.
    pub fn reorder(&mut self, dragged_id: TodoId, target_id: TodoId) -> bool {
        if dragged_id == target_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(dragged_id), self.position(target_id)) else {
            return false;
        };

        let dragged = self.todos.remove(from);
        self.todos.insert(to, dragged);
        self.persist_todos();
        true
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.theme == theme {
            return false;
        }
        self.theme = theme;
        if let Err(e) = storage::save_theme(&mut self.storage, theme) {
            log::error!("Failed to save theme: {:#}", e);
        }
        true
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    /// Resolves a numeric id or a fuzzy text query to a record.
    pub fn find(&self, query: &str) -> Lookup {
        let query = query.trim();
        if let Ok(id) = query.parse::<TodoId>() {
            if self.get(id).is_some() {
                return Lookup::Exact(id);
            }
        }

        if let Some(todo) = self.todos.iter().find(|todo| todo.text.eq_ignore_ascii_case(query)) {
            return Lookup::Exact(todo.id);
        }

        let matcher = SkimMatcherV2::default();
        self.todos
            .iter()
            .filter_map(|todo| matcher.fuzzy_match(&todo.text, query).map(|score| (score, todo.id)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, id)| Lookup::Suggested(id))
            .unwrap_or(Lookup::NotFound)
    }

    /// Wipes persisted state and reloads the defaults.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.storage.clear()?;
        self.todos = storage::load_todos(&self.storage);
        self.theme = storage::load_theme(&self.storage);
        self.pending_delete = None;
        Ok(())
    }

    // Creation-time ids, bumped past the highest id seen so rapid adds never collide.
    fn next_id(&mut self) -> TodoId {
        let now = chrono::Utc::now().timestamp_millis();
        match self.last_id.checked_add(1) {
            Some(next) => {
                self.last_id = now.max(next);
                self.last_id
            }
            None => self.smallest_unused_id(),
        }
    }

    // Only reached once the id space above the highest id is exhausted.
    fn smallest_unused_id(&self) -> TodoId {
        let used: std::collections::HashSet<TodoId> =
            self.todos.iter().map(|todo| todo.id).collect();
        let id = (1..=TodoId::MAX)
            .find(|id| !used.contains(id))
            .unwrap_or(TodoId::MIN);
        log::warn!("Id space exhausted above {}, reusing free id {}", self.last_id, id);
        id
    }

    fn persist_todos(&mut self) {
        if let Err(e) = storage::save_todos(&mut self.storage, &self.todos) {
            log::error!("Failed to save todos: {:#}", e);
        }
    }
}
