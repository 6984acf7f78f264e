use std::fmt::Write;

use crate::drag::DragSession;
use crate::models::{Stats, Theme, TodoId};
use crate::storage::Storage;
use crate::store::TodoStore;

pub const MODAL_TITLE: &str = "Confirm Delete";
pub const MODAL_MESSAGE: &str = "Are you sure you want to delete this todo?";

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub dragging: bool,
    pub drag_over: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub title: &'static str,
    pub message: &'static str,
    pub target: TodoId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub theme: Theme,
    pub items: Vec<ItemView>,
    pub stats: Stats,
    pub modal: Option<ModalView>,
}

impl View {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Derives everything the screen shows from current state.
pub fn project<S: Storage>(store: &TodoStore<S>, drag: &DragSession) -> View {
    let items = store
        .todos()
        .iter()
        .map(|todo| ItemView {
            id: todo.id,
            text: todo.text.clone(),
            completed: todo.completed,
            dragging: drag.dragged == Some(todo.id),
            drag_over: drag.drag_over == Some(todo.id),
        })
        .collect();

    View {
        theme: store.theme(),
        items,
        stats: store.stats(),
        modal: store.pending_delete().map(|target| ModalView {
            title: MODAL_TITLE,
            message: MODAL_MESSAGE,
            target,
        }),
    }
}

pub fn stats_line(stats: &Stats) -> String {
    format!(
        "Total: {}  Completed: {}  Remaining: {}",
        stats.total, stats.completed, stats.remaining
    )
}

/// Plain-text rendering used by the `list` command.
pub fn render_plain(view: &View) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", stats_line(&view.stats));

    if view.is_empty() {
        out.push_str("\nNo todos yet\nAdd your first todo to get started!\n");
        return out;
    }

    out.push('\n');
    for (position, item) in view.items.iter().enumerate() {
        let mark = if item.completed { "x" } else { " " };
        let _ = writeln!(out, "{:>3}. [{}] {}  (id {})", position + 1, mark, item.text, item.id);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Todo;
    use crate::storage::memory::MemoryStorage;

    fn store(todos: Vec<Todo>) -> TodoStore<MemoryStorage> {
        TodoStore::with_state(MemoryStorage::default(), todos, Theme::Dark)
    }

    #[test]
    fn projection_follows_store_order_and_flags() {
        let store = store(vec![Todo::new(1, "A", true), Todo::new(2, "B", false)]);
        let drag = DragSession {
            dragged: Some(2),
            drag_over: Some(1),
        };

        let view = project(&store, &drag);
        assert_eq!(view.theme, Theme::Dark);
        assert_eq!(view.items.len(), 2);
        assert!(view.items[0].completed && view.items[0].drag_over && !view.items[0].dragging);
        assert!(view.items[1].dragging && !view.items[1].drag_over);
        assert_eq!(view.stats, Stats { total: 2, completed: 1, remaining: 1 });
        assert_eq!(view.modal, None);
    }

    #[test]
    fn modal_shows_only_while_delete_is_staged() {
        let mut store = store(vec![Todo::new(1, "A", false)]);
        store.request_delete(1);

        let modal = project(&store, &DragSession::default()).modal.unwrap();
        assert_eq!(modal.title, "Confirm Delete");
        assert_eq!(modal.target, 1);

        store.cancel_delete();
        assert!(project(&store, &DragSession::default()).modal.is_none());
    }

    #[test]
    fn plain_render_lists_items_with_marks() {
        let store = store(vec![Todo::new(5, "Buy milk", false), Todo::new(9, "Pay rent", true)]);
        let text = render_plain(&project(&store, &DragSession::default()));

        assert!(text.starts_with("Total: 2  Completed: 1  Remaining: 1\n"));
        assert!(text.contains("  1. [ ] Buy milk  (id 5)"));
        assert!(text.contains("  2. [x] Pay rent  (id 9)"));
    }

    #[test]
    fn plain_render_of_empty_list() {
        let view = project(&store(Vec::new()), &DragSession::default());
        assert!(view.is_empty());
        let text = render_plain(&view);
        assert!(text.contains("Total: 0  Completed: 0  Remaining: 0"));
        assert!(text.contains("No todos yet"));
    }
}
