/// Search input state for the TUI
pub struct SearchState {
    pub query: String,
    pub cursor_pos: usize,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
        }
    }
}

impl SearchState {
    /// Insert a character at the cursor. Returns true if the query
    /// changed.
    pub fn insert(&mut self, c: char) -> bool {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        true
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev = self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.query.remove(prev);
        self.cursor_pos = prev;
        true
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.query.len() {
            return false;
        }
        self.query.remove(self.cursor_pos);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.query[..self.cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.cursor_pos = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Clear the query. Returns true if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.cursor_pos = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_keeps_cursor_on_char_boundaries() {
        let mut search = SearchState::default();
        search.insert('m');
        search.insert('ã');
        search.insert('o');
        assert_eq!(search.query, "mão");
        assert_eq!(search.cursor_pos, search.query.len());

        search.move_left();
        search.move_left();
        assert_eq!(search.cursor_pos, 1);

        assert!(search.backspace());
        assert_eq!(search.query, "ão");
        assert_eq!(search.cursor_pos, 0);

        assert!(search.delete());
        assert_eq!(search.query, "o");
    }
}
