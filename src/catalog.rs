//! Catalog Ingestion
//!
//! Builds the immutable product snapshot from a JSON attribute map.
//! All attributes arrive as strings (the storefront exposes them as
//! element data attributes); numeric parsing is permissive and never
//! fails the load: an unparseable price becomes NaN and an unparseable
//! amperage becomes `None`. The record set is read once at startup and
//! never mutated afterwards; only visibility/order decisions attached
//! to it by the query engine change over time.

use crate::error::{Result, VoltCatError};
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

/// Amperage values the filter sidebar offers
pub const AMPERAGE_OPTIONS: [u32; 4] = [45, 60, 70, 100];

/// Category tokens the filter sidebar offers
pub const CATEGORY_OPTIONS: [&str; 4] = ["carro", "suv", "caminhao", "moto"];

/// Product line tokens the filter sidebar offers
pub const LINE_OPTIONS: [&str; 3] = ["efb", "agm", "clean"];

/// Glyph counted as a filled star in the rating indicator
const FILLED_STAR: char = '\u{2605}';

/// Maximum rating the star indicator can express
pub const MAX_RATING: u8 = 5;

// ============================================================================
// Wire form
// ============================================================================

/// A product as it appears in the catalog file: a flat attribute map
/// with every value still a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub amperage: String,
    pub line: String,
    /// Five-glyph star indicator, e.g. "★★★★☆"
    pub stars: String,
}

// ============================================================================
// Product record
// ============================================================================

/// One catalog item with fixed attributes
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    /// Opaque identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Lower-cased name, cached for matching
    #[serde(skip)]
    pub name_lower: String,
    /// Price; NaN when the attribute did not parse
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    /// Category token (lower-cased)
    pub category: String,
    /// Amperage; None when the attribute did not parse
    pub amperage: Option<u32>,
    /// Product line token (lower-cased)
    pub line: String,
    /// Star rating, 0..=5
    pub rating: u8,
}

impl ProductRecord {
    /// Build a record from its wire form. Never fails: malformed
    /// numeric attributes degrade instead of erroring.
    pub fn from_raw(raw: &RawProduct) -> Self {
        let name = raw.name.trim().to_string();
        Self {
            id: raw.id.clone(),
            name_lower: name.to_lowercase(),
            name,
            price: parse_price(&raw.price),
            category: raw.category.trim().to_lowercase(),
            amperage: raw.amperage.trim().parse::<u32>().ok(),
            line: raw.line.trim().to_lowercase(),
            rating: parse_rating(&raw.stars),
        }
    }
}

/// JSON cannot carry NaN; an unparsed price serializes as null
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if price.is_nan() {
        serializer.serialize_none()
    } else {
        serializer.serialize_f64(*price)
    }
}

/// Parse a price attribute; unparseable input becomes NaN
fn parse_price(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Count filled stars in the rating indicator, clamped to MAX_RATING
fn parse_rating(stars: &str) -> u8 {
    let filled = stars.chars().filter(|&c| c == FILLED_STAR).count();
    filled.min(MAX_RATING as usize) as u8
}

// ============================================================================
// Catalog
// ============================================================================

/// Statistics about a loaded catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogStats {
    pub total_products: u64,
    /// Lowest parseable price, if any price parsed
    pub min_price: Option<f64>,
    /// Highest parseable price, if any price parsed
    pub max_price: Option<f64>,
    /// Records whose price attribute did not parse
    pub unparsed_prices: u64,
    /// Records whose amperage attribute did not parse
    pub unparsed_amperages: u64,
}

/// The immutable product snapshot for one catalog file
pub struct Catalog {
    /// Where the snapshot came from (file path or label)
    pub source: String,
    records: Vec<ProductRecord>,
    /// Statistics computed at load time
    pub stats: CatalogStats,
}

impl Catalog {
    /// Load a catalog from a JSON file (an array of attribute maps)
    pub fn load(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let data = std::fs::read_to_string(path)
            .map_err(|e| VoltCatError::CatalogOpen(source.clone(), e))?;
        let raw: Vec<RawProduct> = serde_json::from_str(&data)
            .map_err(|e| VoltCatError::CatalogParse(source.clone(), e))?;

        let catalog = Self::from_raw(source.clone(), &raw);
        if catalog.is_empty() {
            return Err(VoltCatError::EmptyCatalog(source));
        }
        Ok(catalog)
    }

    /// Build a catalog from already-decoded wire records
    pub fn from_raw(source: String, raw: &[RawProduct]) -> Self {
        let records: Vec<ProductRecord> = raw.iter().map(ProductRecord::from_raw).collect();
        let stats = compute_stats(&records);
        Self {
            source,
            records,
            stats,
        }
    }

    /// The record snapshot, in insertion order
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Consume the catalog, yielding the record snapshot
    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn compute_stats(records: &[ProductRecord]) -> CatalogStats {
    let mut stats = CatalogStats {
        total_products: records.len() as u64,
        ..Default::default()
    };

    for record in records {
        if record.price.is_nan() {
            stats.unparsed_prices += 1;
        } else {
            stats.min_price = Some(match stats.min_price {
                Some(min) => record.price.min(min),
                None => record.price,
            });
            stats.max_price = Some(match stats.max_price {
                Some(max) => record.price.max(max),
                None => record.price,
            });
        }
        if record.amperage.is_none() {
            stats.unparsed_amperages += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, price: &str, amperage: &str, stars: &str) -> RawProduct {
        RawProduct {
            id: "p1".to_string(),
            name: name.to_string(),
            price: price.to_string(),
            category: "carro".to_string(),
            amperage: amperage.to_string(),
            line: "efb".to_string(),
            stars: stars.to_string(),
        }
    }

    #[test]
    fn record_parses_well_formed_attributes() {
        let record = ProductRecord::from_raw(&raw("Bateria Moura 60A", "350.00", "60", "★★★★☆"));
        assert_eq!(record.name, "Bateria Moura 60A");
        assert_eq!(record.name_lower, "bateria moura 60a");
        assert_eq!(record.price, 350.0);
        assert_eq!(record.amperage, Some(60));
        assert_eq!(record.rating, 4);
    }

    #[test]
    fn malformed_price_degrades_to_nan() {
        let record = ProductRecord::from_raw(&raw("x", "abc", "60", "★"));
        assert!(record.price.is_nan());
    }

    #[test]
    fn malformed_amperage_degrades_to_none() {
        let record = ProductRecord::from_raw(&raw("x", "100.0", "6O", "★"));
        assert_eq!(record.amperage, None);
    }

    #[test]
    fn rating_counts_only_filled_stars_and_clamps() {
        assert_eq!(ProductRecord::from_raw(&raw("x", "1", "45", "☆☆☆☆☆")).rating, 0);
        assert_eq!(ProductRecord::from_raw(&raw("x", "1", "45", "★★★☆☆")).rating, 3);
        assert_eq!(ProductRecord::from_raw(&raw("x", "1", "45", "★★★★★★★")).rating, 5);
    }

    #[test]
    fn catalog_from_json_computes_stats() {
        let data = r#"[
            {"id":"a","name":"Bateria 45","price":"280.0","category":"carro","amperage":"45","line":"efb","stars":"★★★☆☆"},
            {"id":"b","name":"Bateria 100","price":"700.0","category":"caminhao","amperage":"100","line":"agm","stars":"★★★★★"},
            {"id":"c","name":"Bateria ???","price":"n/a","category":"moto","amperage":"??","line":"clean","stars":"★★☆☆☆"}
        ]"#;
        let raw: Vec<RawProduct> = serde_json::from_str(data).unwrap();
        let catalog = Catalog::from_raw("test".to_string(), &raw);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.stats.total_products, 3);
        assert_eq!(catalog.stats.min_price, Some(280.0));
        assert_eq!(catalog.stats.max_price, Some(700.0));
        assert_eq!(catalog.stats.unparsed_prices, 1);
        assert_eq!(catalog.stats.unparsed_amperages, 1);
    }
}
