//! Crawler module for walking the catalog
//!
//! This module contains the core crawling logic, including:
//! - Category discovery from the site navigation
//! - Pagination through each category's listing
//! - Per-item record extraction and badge highlighting
//! - Image download and WebP caching
//! - Overall crawl coordination

mod coordinator;
mod discovery;
mod extractor;
mod images;
mod walker;

pub use coordinator::{run_crawl, Coordinator};
pub use discovery::{discover, read_sidebar_links, SidebarLink};
pub use extractor::{
    ExtractedItem, ImageOutcome, ItemContext, RecordExtractor, DEFAULT_COLOR, DEFAULT_PRICE_TEXT,
    DEFAULT_TITLE,
};
pub use images::{
    build_http_client, image_path, sanitize_image_name, ImageError, ImageStore, IMAGE_EXTENSION,
    MAX_IMAGE_NAME_CHARS,
};
pub use walker::{PaginationWalker, WalkReport};
