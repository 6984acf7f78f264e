/// Single-line text input. The cursor is a char index, not a byte offset.
#[derive(Debug, Clone)]
pub struct LineEditor {
    pub content: String,
    pub cursor: usize,
    pub title: String,
    original: String,
}

impl LineEditor {
    pub fn new(title: String, content: String) -> Self {
        let cursor = content.chars().count();
        LineEditor {
            original: content.clone(),
            content,
            cursor,
            title,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.content != self.original
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start_of_line(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end_of_line(&mut self) {
        self.cursor = self.len();
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.byte_index(self.cursor))
    }

    pub fn get_content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_cursor_at_end() {
        let editor = LineEditor::new("Edit".into(), "héllo".into());
        assert_eq!(editor.cursor, 5);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn inserts_and_deletes_around_multibyte_chars() {
        let mut editor = LineEditor::new("Edit".into(), "héllo".into());
        editor.move_to_start_of_line();
        editor.move_cursor_right();
        editor.move_cursor_right();
        editor.delete_char();
        assert_eq!(editor.get_content(), "hllo");

        editor.insert_char('é');
        editor.insert_char('✓');
        assert_eq!(editor.get_content(), "hé✓llo");
        assert_eq!(editor.split_at_cursor(), ("hé✓", "llo"));
        assert!(editor.is_dirty());
    }

    #[test]
    fn edge_moves_are_clamped() {
        let mut editor = LineEditor::new("Add".into(), String::new());
        editor.move_cursor_left();
        editor.delete_char();
        editor.delete_forward();
        editor.move_cursor_right();
        assert_eq!(editor.cursor, 0);

        editor.insert_char('a');
        editor.insert_char('b');
        editor.move_to_start_of_line();
        editor.delete_forward();
        assert_eq!(editor.get_content(), "b");
        editor.move_to_end_of_line();
        assert_eq!(editor.cursor, 1);
    }
}
