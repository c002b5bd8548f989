//! VoltCat - Interactive battery catalog browser
//!
//! Re-implements the interactive surface of a battery storefront as a
//! terminal application: an immutable product snapshot is loaded once,
//! and a query engine recomputes visibility and display order as the
//! user searches, toggles filters, and changes the sort key.
//!
//! # Features
//!
//! - **Live Search**: case-insensitive substring search over name,
//!   category and line, debounced so evaluation fires after input
//!   settles
//! - **Checkbox Filtering**: amperage / category / line groups, AND
//!   across groups and OR within a group
//! - **Stable Sorting**: price ascending/descending and rating
//!   descending, ties keeping insertion order
//! - **No-results Signalling**: one outcome per recomputation drives
//!   the placeholder
//! - **TUI Browser**: search bar, filter sidebar and product table
//!
//! # Example
//!
//! ```
//! use voltcat::{ActiveFilters, CatalogEngine, ProductRecord, RawProduct, SortKey};
//!
//! let raw = vec![
//!     RawProduct {
//!         id: "m60".into(),
//!         name: "Bateria Moura 60A".into(),
//!         price: "350.00".into(),
//!         category: "carro".into(),
//!         amperage: "60".into(),
//!         line: "efb".into(),
//!         stars: "★★★★☆".into(),
//!     },
//!     RawProduct {
//!         id: "m100".into(),
//!         name: "Bateria Moura 100A".into(),
//!         price: "700.00".into(),
//!         category: "caminhao".into(),
//!         amperage: "100".into(),
//!         line: "agm".into(),
//!         stars: "★★★★★".into(),
//!     },
//! ];
//!
//! let records: Vec<ProductRecord> = raw.iter().map(ProductRecord::from_raw).collect();
//! let mut engine = CatalogEngine::new(records);
//!
//! let outcome = engine.apply_search("moura");
//! assert_eq!(outcome.visible_count, 2);
//!
//! engine.apply_sort(SortKey::PriceHigh);
//! let prices: Vec<f64> = engine.visible_records().iter().map(|r| r.price).collect();
//! assert_eq!(prices, vec![700.0, 350.0]);
//! ```

pub mod catalog;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod query;
pub mod tui;

// Re-export main types
pub use catalog::{
    Catalog, CatalogStats, ProductRecord, RawProduct, AMPERAGE_OPTIONS, CATEGORY_OPTIONS,
    LINE_OPTIONS, MAX_RATING,
};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use error::{Result, VoltCatError};
pub use query::{
    filter_visibility, search_visibility, sort_order, ActiveFilters, CatalogEngine, QueryOutcome,
    QueryState, SortKey,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format a price as Brazilian currency, e.g. "R$ 1.234,56".
/// Unparseable prices render as a placeholder.
pub fn format_price(price: f64) -> String {
    if price.is_nan() {
        return "R$ --".to_string();
    }

    let cents = (price * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = cents / 100;
    let frac = cents % 100;

    // Group the integer part with dots, Brazilian style.
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("R$ {}{},{:02}", sign, grouped, frac)
}

/// Render a rating as a five-glyph star indicator
pub fn format_stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let mut out = String::new();
    for _ in 0..filled {
        out.push('\u{2605}');
    }
    for _ in filled..MAX_RATING as usize {
        out.push('\u{2606}');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_formatting_groups_thousands() {
        assert_eq!(format_price(350.0), "R$ 350,00");
        assert_eq!(format_price(1234.5), "R$ 1.234,50");
        assert_eq!(format_price(1234567.89), "R$ 1.234.567,89");
        assert_eq!(format_price(f64::NAN), "R$ --");
    }

    #[test]
    fn stars_render_filled_then_empty() {
        assert_eq!(format_stars(0), "☆☆☆☆☆");
        assert_eq!(format_stars(4), "★★★★☆");
        assert_eq!(format_stars(7), "★★★★★");
    }
}
