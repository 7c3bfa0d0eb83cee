//! Catalog Harvester: a product catalog crawler for JavaScript-rendered shops
//!
//! This crate walks every category of a paginated catalog through a browser
//! driver, extracts product records, applies the price markup, caches product
//! images as WebP files and exports the records to a tabular sink.

pub mod config;
pub mod crawler;
pub mod driver;
pub mod model;
pub mod output;
pub mod price;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for catalog crawl operations
///
/// Only conditions that must stop the whole run end up here. Per-item and
/// per-category problems are logged and absorbed by the crawler.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser driver error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Catalog entry page {url} is unreachable: {source}")]
    EntryUnreachable {
        url: String,
        source: driver::DriverError,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid walk state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WalkState,
        to: state::WalkState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for {field}: {selector}")]
    InvalidSelector { field: String, selector: String },
}

/// Result type alias for catalog crawl operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Category, ProductRecord};
pub use price::parse_price;
pub use state::WalkState;
