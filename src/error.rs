//! Error types for VoltCat
//!
//! Covers catalog ingestion and query-surface failures. Malformed
//! numeric product attributes are NOT errors; they degrade at ingestion
//! (see `catalog`).

use thiserror::Error;

/// Main error type for VoltCat operations
#[derive(Error, Debug)]
pub enum VoltCatError {
    #[error("Failed to open catalog '{0}': {1}")]
    CatalogOpen(String, std::io::Error),

    #[error("Failed to parse catalog '{0}': {1}")]
    CatalogParse(String, serde_json::Error),

    #[error("Catalog '{0}' contains no products")]
    EmptyCatalog(String),

    #[error("Unknown sort key '{0}' (expected relevance, price-low, price-high or rating)")]
    UnknownSortKey(String),

    #[error("Unknown filter value '{0}' (expected an amperage, category or line token)")]
    UnknownFilter(String),

    #[error("Failed to encode results as JSON: {0}")]
    JsonEncode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for VoltCat operations
pub type Result<T> = std::result::Result<T, VoltCatError>;
