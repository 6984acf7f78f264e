use crate::models::TodoId;
use crate::store::TodoStore;
use crate::storage::Storage;

/// Transient grab-and-drop state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    pub dragged: Option<TodoId>,
    pub drag_over: Option<TodoId>,
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn drag_start(&mut self, id: TodoId) {
        self.dragged = Some(id);
        self.drag_over = None;
    }

    pub fn drag_over(&mut self, id: TodoId) {
        if self.dragged.is_some() {
            self.drag_over = Some(id);
        }
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
        self.drag_over = None;
    }

    /// Reorders `dragged` onto `target` when they differ, then ends the gesture.
    pub fn drop<S: Storage>(&mut self, target: TodoId, store: &mut TodoStore<S>) -> bool {
        let moved = match self.dragged {
            Some(dragged) if dragged != target => store.reorder(dragged, target),
            _ => false,
        };
        self.drag_end();
        moved
    }
}
