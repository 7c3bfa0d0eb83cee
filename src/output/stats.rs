//! Run statistics
//!
//! Counters gathered while crawling, logged at the end of a run, printed by
//! the CLI and rendered into the Markdown summary.

use crate::crawler::{ExtractedItem, ImageOutcome};

/// Outcome of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub name: String,
    pub pages: u32,
    pub records: u64,
    /// Reason the category was skipped, if it was
    pub skipped: Option<String>,
}

/// Counters for one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub config_hash: String,

    pub categories_discovered: u64,
    pub categories_crawled: u64,
    pub categories_skipped: u64,
    pub pages_visited: u64,

    pub records: u64,
    pub prices_missing: u64,
    pub images_saved: u64,
    pub images_failed: u64,
    pub flagged: u64,

    /// Per-category breakdown in crawl order
    pub categories: Vec<CategoryStats>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one extracted item
    pub fn record_item(&mut self, item: &ExtractedItem) {
        self.records += 1;
        if item.record.price.is_none() {
            self.prices_missing += 1;
        }
        if item.flagged {
            self.flagged += 1;
        }
        match item.image {
            ImageOutcome::Saved => self.images_saved += 1,
            ImageOutcome::Failed => self.images_failed += 1,
            ImageOutcome::Absent => {}
        }
    }

    /// Counts one finished category
    pub fn record_category(&mut self, category: CategoryStats) {
        if category.skipped.is_some() {
            self.categories_skipped += 1;
        } else {
            self.categories_crawled += 1;
        }
        self.categories.push(category);
    }

    /// Share of records whose price parsed, as a percentage
    pub fn priced_rate(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        ((self.records - self.prices_missing) as f64 / self.records as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Categories:");
    println!("  Discovered: {}", stats.categories_discovered);
    println!("  Crawled: {}", stats.categories_crawled);
    println!("  Skipped: {}", stats.categories_skipped);
    println!("  Pages visited: {}", stats.pages_visited);
    println!();

    println!("Records:");
    println!("  Total: {}", stats.records);
    println!(
        "  Without price: {} ({:.1}% priced)",
        stats.prices_missing,
        stats.priced_rate()
    );
    println!("  Flagged by badge: {}", stats.flagged);
    println!();

    println!("Images:");
    println!("  Saved: {}", stats.images_saved);
    println!("  Failed: {}", stats.images_failed);

    let skipped: Vec<_> = stats
        .categories
        .iter()
        .filter_map(|c| c.skipped.as_deref().map(|reason| (c.name.as_str(), reason)))
        .collect();
    if !skipped.is_empty() {
        println!("\nSkipped Categories:");
        for (name, reason) in skipped {
            println!("  {}: {}", name, reason);
        }
    }

    if let Some(duration) = stats.duration_seconds {
        println!("\nDuration: {}s", duration);
    }
}
