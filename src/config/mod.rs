//! Configuration module for Catalog Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Crawling from: {}", config.site.entry_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BadgeConfig, BrowserConfig, Config, HttpConfig, OutputConfig, OutputFormat, SelectorConfig,
    SiteConfig, TimingConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
