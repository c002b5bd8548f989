//! Catalog Query Engine
//!
//! Computes visibility and display order over the immutable product
//! snapshot. The pure operations (`search_visibility`,
//! `filter_visibility`, `sort_order`) take and return plain data so the
//! presentation layer owns all rendering; `CatalogEngine` holds the
//! snapshot plus the live decisions and exposes the interaction
//! handlers.
//!
//! Matching semantics worth knowing up front:
//! - search is literal, case-insensitive substring containment over
//!   name, category and line; no tokenization, no fuzzy matching;
//! - the category filter uses substring containment while the line
//!   filter uses exact equality; the asymmetry is deliberate;
//! - `apply_search` and `apply_filters` each recompute visibility from
//!   their own criterion alone, so a filter selection does not
//!   constrain a later search (and vice versa); `apply_query` is the
//!   composed evaluation for one-shot callers.

use crate::catalog::{ProductRecord, AMPERAGE_OPTIONS, CATEGORY_OPTIONS, LINE_OPTIONS};
use crate::error::{Result, VoltCatError};
use std::cmp::Ordering;
use std::str::FromStr;

// ============================================================================
// Sort key
// ============================================================================

/// The active criterion governing display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Original insertion order (no reordering)
    #[default]
    Relevance,
    /// Price, increasing
    PriceLow,
    /// Price, decreasing
    PriceHigh,
    /// Rating, decreasing
    Rating,
}

impl SortKey {
    /// All keys, in the order the sort dropdown offers them
    pub const ALL: [SortKey; 4] = [
        SortKey::Relevance,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Rating,
    ];

    /// The dropdown token for this key
    pub fn token(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevância",
            SortKey::PriceLow => "Menor preço",
            SortKey::PriceHigh => "Maior preço",
            SortKey::Rating => "Melhor avaliação",
        }
    }

    /// The next key in dropdown order, wrapping around
    pub fn next(&self) -> SortKey {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for SortKey {
    type Err = VoltCatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            "rating" => Ok(SortKey::Rating),
            other => Err(VoltCatError::UnknownSortKey(other.to_string())),
        }
    }
}

// ============================================================================
// Active filters
// ============================================================================

/// The selected checkbox values, grouped. An empty group means
/// "no constraint" for that group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveFilters {
    pub amperage: Vec<u32>,
    pub category: Vec<String>,
    pub line: Vec<String>,
}

impl ActiveFilters {
    /// No constraint in any group
    pub fn is_empty(&self) -> bool {
        self.amperage.is_empty() && self.category.is_empty() && self.line.is_empty()
    }

    /// Classify a flat list of checkbox values into groups by
    /// membership in the fixed vocabularies. Values outside every
    /// vocabulary are rejected.
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let mut filters = ActiveFilters::default();

        for value in values {
            let value = value.as_ref().trim().to_lowercase();

            if let Ok(amps) = value.parse::<u32>() {
                if AMPERAGE_OPTIONS.contains(&amps) {
                    filters.amperage.push(amps);
                    continue;
                }
            }
            if CATEGORY_OPTIONS.contains(&value.as_str()) {
                filters.category.push(value);
            } else if LINE_OPTIONS.contains(&value.as_str()) {
                filters.line.push(value);
            } else {
                return Err(VoltCatError::UnknownFilter(value));
            }
        }

        Ok(filters)
    }

    /// Does this record pass every active group? AND across groups,
    /// OR within a group.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        if !self.amperage.is_empty() {
            // A record without a parseable amperage never matches an
            // active amperage set.
            let passes = match record.amperage {
                Some(amps) => self.amperage.contains(&amps),
                None => false,
            };
            if !passes {
                return false;
            }
        }

        if !self.category.is_empty() {
            // Substring containment: "suv" selects "suv-premium" too.
            let passes = self
                .category
                .iter()
                .any(|token| record.category.contains(token.as_str()));
            if !passes {
                return false;
            }
        }

        if !self.line.is_empty() {
            // Exact equality: "agm" does NOT select "agm-plus".
            let passes = self.line.iter().any(|line| record.line == *line);
            if !passes {
                return false;
            }
        }

        true
    }
}

// ============================================================================
// Query state
// ============================================================================

/// One complete set of active query parameters, rebuilt per interaction
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    /// Normalized (lower-cased, trimmed) search term, possibly empty
    pub search_term: String,
    pub filters: ActiveFilters,
    pub sort: SortKey,
}

impl QueryState {
    pub fn new(raw_term: &str, filters: ActiveFilters, sort: SortKey) -> Self {
        Self {
            search_term: normalize_term(raw_term),
            filters,
            sort,
        }
    }
}

/// Normalize a raw search term for matching
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ============================================================================
// Pure operations
// ============================================================================

/// Per-record visibility under a normalized search term: visible iff
/// the term is empty or is a substring of the lower-cased name,
/// category, or line.
pub fn search_visibility(records: &[ProductRecord], term: &str) -> Vec<bool> {
    records
        .iter()
        .map(|record| {
            term.is_empty()
                || record.name_lower.contains(term)
                || record.category.contains(term)
                || record.line.contains(term)
        })
        .collect()
}

/// Per-record visibility under the active filter sets
pub fn filter_visibility(records: &[ProductRecord], filters: &ActiveFilters) -> Vec<bool> {
    records.iter().map(|record| filters.matches(record)).collect()
}

/// Stable permutation of insertion indices under a sort key. Ties keep
/// insertion order; records with an unparseable price order after all
/// priced records in both price directions.
pub fn sort_order(records: &[ProductRecord], key: SortKey) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();

    match key {
        SortKey::Relevance => {}
        SortKey::PriceLow => {
            order.sort_by(|&a, &b| cmp_price(records[a].price, records[b].price, false));
        }
        SortKey::PriceHigh => {
            order.sort_by(|&a, &b| cmp_price(records[a].price, records[b].price, true));
        }
        SortKey::Rating => {
            order.sort_by(|&a, &b| records[b].rating.cmp(&records[a].rating));
        }
    }

    order
}

/// Price comparison with NaN ordered last regardless of direction
fn cmp_price(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let cmp = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                cmp.reverse()
            } else {
                cmp
            }
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Result of one visibility recomputation. Emitted exactly once per
/// recomputation so the "no results" placeholder is never accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOutcome {
    pub visible_count: usize,
    pub no_results: bool,
}

impl QueryOutcome {
    fn from_visibility(visible: &[bool]) -> Self {
        let visible_count = visible.iter().filter(|&&v| v).count();
        Self {
            visible_count,
            no_results: visible_count == 0,
        }
    }
}

/// Holds the immutable record snapshot plus the live visibility/order
/// decision. Constructed once at startup and passed explicitly to the
/// presentation layer.
pub struct CatalogEngine {
    records: Vec<ProductRecord>,
    visible: Vec<bool>,
    order: Vec<usize>,
    query: QueryState,
}

impl CatalogEngine {
    /// Create an engine over a record snapshot: everything visible, in
    /// insertion order.
    pub fn new(records: Vec<ProductRecord>) -> Self {
        let visible = vec![true; records.len()];
        let order = (0..records.len()).collect();
        Self {
            records,
            visible,
            order,
            query: QueryState::default(),
        }
    }

    /// The record snapshot, in insertion order
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// The query parameters currently applied
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Recompute visibility from the search criterion alone. The
    /// previous filter selection is not consulted.
    pub fn apply_search(&mut self, raw_term: &str) -> QueryOutcome {
        self.query.search_term = normalize_term(raw_term);
        self.visible = search_visibility(&self.records, &self.query.search_term);
        QueryOutcome::from_visibility(&self.visible)
    }

    /// Recompute visibility from the filter criteria alone. The
    /// previous search term is not consulted.
    pub fn apply_filters(&mut self, filters: ActiveFilters) -> QueryOutcome {
        self.visible = filter_visibility(&self.records, &filters);
        self.query.filters = filters;
        QueryOutcome::from_visibility(&self.visible)
    }

    /// Recompute the display order
    pub fn apply_sort(&mut self, key: SortKey) {
        self.query.sort = key;
        self.order = sort_order(&self.records, key);
    }

    /// Combined one-shot evaluation: search AND filters, then sort
    pub fn apply_query(&mut self, state: QueryState) -> QueryOutcome {
        let by_search = search_visibility(&self.records, &state.search_term);
        let by_filters = filter_visibility(&self.records, &state.filters);
        self.visible = by_search
            .iter()
            .zip(by_filters.iter())
            .map(|(&s, &f)| s && f)
            .collect();
        self.order = sort_order(&self.records, state.sort);
        self.query = state;
        QueryOutcome::from_visibility(&self.visible)
    }

    /// Is the record at this insertion index currently visible?
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Insertion indices of the visible records, in display order
    pub fn visible_indices(&self) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|&idx| self.visible[idx])
            .collect()
    }

    /// The visible records themselves, in display order
    pub fn visible_records(&self) -> Vec<&ProductRecord> {
        self.visible_indices()
            .into_iter()
            .map(|idx| &self.records[idx])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawProduct;

    fn record(
        name: &str,
        price: &str,
        category: &str,
        amperage: &str,
        line: &str,
        stars: &str,
    ) -> ProductRecord {
        ProductRecord::from_raw(&RawProduct {
            id: name.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            category: category.to_string(),
            amperage: amperage.to_string(),
            line: line.to_string(),
            stars: stars.to_string(),
        })
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            record("Bateria Moura 60A", "350", "carro", "60", "efb", "★★★★☆"),
            record("Bateria Moura 100A", "700", "caminhao", "100", "agm", "★★★★★"),
            record("Bateria Heliar 45A", "280", "moto", "45", "clean", "★★★☆☆"),
            record("Bateria Moura 70A", "420", "suv", "70", "agm", "★★★★☆"),
        ]
    }

    #[test]
    fn empty_term_marks_every_record_visible() {
        let records = sample();
        assert!(search_visibility(&records, "").iter().all(|&v| v));
    }

    #[test]
    fn search_matches_name_category_and_line() {
        let records = sample();
        assert_eq!(
            search_visibility(&records, "moura"),
            vec![true, true, false, true]
        );
        assert_eq!(
            search_visibility(&records, "moto"),
            vec![false, false, true, false]
        );
        assert_eq!(
            search_visibility(&records, "agm"),
            vec![false, true, false, true]
        );
        assert_eq!(
            search_visibility(&records, "tractor"),
            vec![false, false, false, false]
        );
    }

    #[test]
    fn search_is_case_insensitive_after_normalization() {
        let records = sample();
        let term = normalize_term("  MOURA ");
        assert_eq!(term, "moura");
        assert_eq!(search_visibility(&records, &term), vec![true, true, false, true]);
    }

    #[test]
    fn no_active_filters_keeps_full_set_visible() {
        let records = sample();
        let visible = filter_visibility(&records, &ActiveFilters::default());
        assert!(visible.iter().all(|&v| v));
    }

    #[test]
    fn amperage_filter_is_set_membership() {
        let records = sample();
        let filters = ActiveFilters {
            amperage: vec![60],
            ..Default::default()
        };
        assert_eq!(
            filter_visibility(&records, &filters),
            vec![true, false, false, false]
        );
    }

    #[test]
    fn unparseable_amperage_never_matches_an_active_set() {
        let records = vec![record("x", "100", "carro", "6O", "efb", "★")];
        let filters = ActiveFilters {
            amperage: vec![45, 60, 70, 100],
            ..Default::default()
        };
        assert_eq!(filter_visibility(&records, &filters), vec![false]);
    }

    #[test]
    fn category_filter_uses_substring_containment() {
        let records = vec![record("x", "100", "suv-premium", "60", "efb", "★")];
        let filters = ActiveFilters {
            category: vec!["suv".to_string()],
            ..Default::default()
        };
        assert_eq!(filter_visibility(&records, &filters), vec![true]);
    }

    #[test]
    fn line_filter_uses_exact_equality() {
        let records = vec![record("x", "100", "carro", "60", "agm-plus", "★")];
        let filters = ActiveFilters {
            line: vec!["agm".to_string()],
            ..Default::default()
        };
        assert_eq!(filter_visibility(&records, &filters), vec![false]);
    }

    #[test]
    fn groups_combine_with_and_semantics() {
        let records = sample();
        let filters = ActiveFilters {
            amperage: vec![100, 70],
            line: vec!["agm".to_string()],
            ..Default::default()
        };
        assert_eq!(
            filter_visibility(&records, &filters),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn filter_classification_routes_tokens_by_vocabulary() {
        let filters =
            ActiveFilters::from_values(&["60", "suv", "agm", "100"]).unwrap();
        assert_eq!(filters.amperage, vec![60, 100]);
        assert_eq!(filters.category, vec!["suv".to_string()]);
        assert_eq!(filters.line, vec!["agm".to_string()]);
    }

    #[test]
    fn filter_classification_rejects_unknown_tokens() {
        let err = ActiveFilters::from_values(&["59"]).unwrap_err();
        assert!(matches!(err, VoltCatError::UnknownFilter(_)));
        let err = ActiveFilters::from_values(&["bicicleta"]).unwrap_err();
        assert!(matches!(err, VoltCatError::UnknownFilter(_)));
    }

    #[test]
    fn price_ascending_is_reverse_of_descending_for_distinct_prices() {
        let records = sample();
        let low = sort_order(&records, SortKey::PriceLow);
        let mut high = sort_order(&records, SortKey::PriceHigh);
        high.reverse();
        assert_eq!(low, high);
        assert_eq!(low, vec![2, 0, 3, 1]);
    }

    #[test]
    fn rating_sort_is_stable_on_ties() {
        let records = sample();
        // Records 0 and 3 share rating 4; insertion order must hold.
        assert_eq!(sort_order(&records, SortKey::Rating), vec![1, 0, 3, 2]);
    }

    #[test]
    fn relevance_keeps_insertion_order() {
        let records = sample();
        assert_eq!(sort_order(&records, SortKey::Relevance), vec![0, 1, 2, 3]);
    }

    #[test]
    fn nan_prices_order_last_in_both_directions() {
        let records = vec![
            record("a", "n/a", "carro", "60", "efb", "★"),
            record("b", "350", "carro", "60", "efb", "★"),
            record("c", "700", "carro", "60", "efb", "★"),
        ];
        assert_eq!(sort_order(&records, SortKey::PriceLow), vec![1, 2, 0]);
        assert_eq!(sort_order(&records, SortKey::PriceHigh), vec![2, 1, 0]);
    }

    #[test]
    fn search_then_sort_end_to_end() {
        let records = vec![
            record("bateria moura 60a", "350", "carro", "60", "efb", "★★★★☆"),
            record("bateria moura 100a", "700", "caminhao", "100", "agm", "★★★★★"),
        ];
        let mut engine = CatalogEngine::new(records);

        let outcome = engine.apply_search("moura");
        assert_eq!(outcome.visible_count, 2);
        engine.apply_sort(SortKey::PriceHigh);

        let prices: Vec<f64> = engine.visible_records().iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![700.0, 350.0]);
    }

    #[test]
    fn amperage_filter_end_to_end() {
        let records = vec![
            record("bateria moura 60a", "350", "carro", "60", "efb", "★★★★☆"),
            record("bateria moura 100a", "700", "caminhao", "100", "agm", "★★★★★"),
        ];
        let mut engine = CatalogEngine::new(records);

        let filters = ActiveFilters {
            amperage: vec![60],
            ..Default::default()
        };
        let outcome = engine.apply_filters(filters);
        assert_eq!(outcome.visible_count, 1);

        let visible = engine.visible_records();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "bateria moura 60a");
    }

    #[test]
    fn search_recomputes_visibility_without_consulting_filters() {
        let mut engine = CatalogEngine::new(sample());

        let filters = ActiveFilters {
            amperage: vec![100],
            ..Default::default()
        };
        assert_eq!(engine.apply_filters(filters).visible_count, 1);

        // A later search starts over from its own criterion: the
        // amperage selection no longer constrains the result.
        let outcome = engine.apply_search("moura");
        assert_eq!(outcome.visible_count, 3);
    }

    #[test]
    fn combined_query_applies_search_and_filters_together() {
        let mut engine = CatalogEngine::new(sample());

        let state = QueryState::new(
            "MOURA",
            ActiveFilters {
                line: vec!["agm".to_string()],
                ..Default::default()
            },
            SortKey::PriceLow,
        );
        let outcome = engine.apply_query(state);

        assert_eq!(outcome.visible_count, 2);
        let names: Vec<&str> = engine
            .visible_records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bateria Moura 70A", "Bateria Moura 100A"]);
    }

    #[test]
    fn no_results_is_signalled_once_per_recomputation() {
        let mut engine = CatalogEngine::new(sample());

        let first = engine.apply_search("inexistente");
        assert!(first.no_results);
        assert_eq!(first.visible_count, 0);

        // A second recomputation produces its own single outcome.
        let second = engine.apply_search("inexistente ainda");
        assert!(second.no_results);

        let recovered = engine.apply_search("moura");
        assert!(!recovered.no_results);
    }

    #[test]
    fn sort_key_round_trips_through_tokens() {
        for key in SortKey::ALL {
            assert_eq!(key.token().parse::<SortKey>().unwrap(), key);
        }
        assert!("price".parse::<SortKey>().is_err());
    }
}
