//! Filter sidebar state: checkbox groups over the fixed amperage,
//! category and line vocabularies.

use crate::catalog::{AMPERAGE_OPTIONS, CATEGORY_OPTIONS, LINE_OPTIONS};
use crate::query::ActiveFilters;

/// Which vocabulary a checkbox belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroup {
    Amperage,
    Category,
    Line,
}

impl FilterGroup {
    pub fn title(&self) -> &'static str {
        match self {
            FilterGroup::Amperage => "Amperagem",
            FilterGroup::Category => "Categoria",
            FilterGroup::Line => "Linha",
        }
    }
}

/// One checkbox in the sidebar
pub struct FilterItem {
    pub group: FilterGroup,
    pub label: String,
    pub value: String,
    pub checked: bool,
}

/// The filter sidebar: a flat cursor over grouped checkboxes
pub struct FilterPanel {
    pub items: Vec<FilterItem>,
    pub cursor: usize,
}

impl Default for FilterPanel {
    fn default() -> Self {
        let mut items = Vec::new();

        for amps in AMPERAGE_OPTIONS {
            items.push(FilterItem {
                group: FilterGroup::Amperage,
                label: format!("{} Ah", amps),
                value: amps.to_string(),
                checked: false,
            });
        }
        for category in CATEGORY_OPTIONS {
            items.push(FilterItem {
                group: FilterGroup::Category,
                label: category_label(category).to_string(),
                value: category.to_string(),
                checked: false,
            });
        }
        for line in LINE_OPTIONS {
            items.push(FilterItem {
                group: FilterGroup::Line,
                label: line.to_uppercase(),
                value: line.to_string(),
                checked: false,
            });
        }

        Self { items, cursor: 0 }
    }
}

impl FilterPanel {
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1).min(self.items.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Toggle the checkbox under the cursor
    pub fn toggle_current(&mut self) {
        if let Some(item) = self.items.get_mut(self.cursor) {
            item.checked = !item.checked;
        }
    }

    /// Uncheck every checkbox. Returns true if any was checked.
    pub fn clear(&mut self) -> bool {
        let had_active = self.items.iter().any(|item| item.checked);
        for item in &mut self.items {
            item.checked = false;
        }
        had_active
    }

    /// Collect the checked values into grouped filter sets. Checkbox
    /// values come from the fixed vocabularies, so classification
    /// cannot fail here.
    pub fn active_filters(&self) -> ActiveFilters {
        let mut filters = ActiveFilters::default();
        for item in self.items.iter().filter(|item| item.checked) {
            match item.group {
                FilterGroup::Amperage => {
                    if let Ok(amps) = item.value.parse::<u32>() {
                        filters.amperage.push(amps);
                    }
                }
                FilterGroup::Category => filters.category.push(item.value.clone()),
                FilterGroup::Line => filters.line.push(item.value.clone()),
            }
        }
        filters
    }
}

/// Display label for a category token
pub fn category_label(category: &str) -> &'static str {
    match category {
        "carro" => "Carro",
        "suv" => "SUV",
        "caminhao" => "Caminhão",
        "moto" => "Moto",
        _ => "Outros",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_lists_every_vocabulary_entry() {
        let panel = FilterPanel::default();
        assert_eq!(
            panel.items.len(),
            AMPERAGE_OPTIONS.len() + CATEGORY_OPTIONS.len() + LINE_OPTIONS.len()
        );
    }

    #[test]
    fn toggled_checkboxes_land_in_their_groups() {
        let mut panel = FilterPanel::default();

        // First amperage entry and first line entry.
        panel.cursor = 0;
        panel.toggle_current();
        panel.cursor = AMPERAGE_OPTIONS.len() + CATEGORY_OPTIONS.len();
        panel.toggle_current();

        let filters = panel.active_filters();
        assert_eq!(filters.amperage, vec![AMPERAGE_OPTIONS[0]]);
        assert!(filters.category.is_empty());
        assert_eq!(filters.line, vec![LINE_OPTIONS[0].to_string()]);

        assert!(panel.clear());
        assert!(panel.active_filters().is_empty());
    }
}
