/// Product table display state
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl TableState {
    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self) {
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    /// Reset the cursor after a recomputation changed the row set
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_scrolls_the_viewport() {
        let mut table = TableState {
            visible_rows: 3,
            ..Default::default()
        };

        for _ in 0..5 {
            table.select_next(6);
        }
        assert_eq!(table.selected, Some(4));
        assert_eq!(table.scroll_offset, 2);

        table.select_first();
        assert_eq!(table.scroll_offset, 0);

        table.select_last(6);
        assert_eq!(table.selected, Some(5));
        assert_eq!(table.scroll_offset, 3);
    }

    #[test]
    fn reset_clears_selection_when_empty() {
        let mut table = TableState::default();
        table.select_next(4);
        table.reset(0);
        assert_eq!(table.selected, None);
        table.reset(2);
        assert_eq!(table.selected, Some(0));
    }
}
