//! Crawl controller - main crawl orchestration logic
//!
//! Opens the catalog entry page, gives a human time to register, discovers
//! categories from the navigation and walks them one after another. The
//! sink is finished exactly once, after the last category.

use crate::config::Config;
use crate::crawler::discovery::{discover, read_sidebar_links};
use crate::crawler::extractor::RecordExtractor;
use crate::crawler::images::{build_http_client, ImageStore};
use crate::crawler::walker::PaginationWalker;
use crate::driver::{BrowserDriver, ChromiumDriver, DriverError};
use crate::model::Category;
use crate::output::{build_sink, generate_markdown_summary, CategoryStats, CrawlStats, ResultSink};
use crate::CatalogError;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Main crawl coordinator
///
/// The driver, image store and sink are injected, so any driver providing
/// the capabilities can run a crawl.
pub struct Coordinator<'a, D: BrowserDriver, S: ResultSink + ?Sized> {
    config: &'a Config,
    driver: &'a D,
    images: &'a ImageStore,
    sink: &'a mut S,
    base_url: Url,
    config_hash: String,
}

impl<'a, D: BrowserDriver, S: ResultSink + ?Sized> Coordinator<'a, D, S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `driver` - Browser driver positioned on any page
    /// * `images` - Store receiving product images
    /// * `sink` - Destination for extracted records
    pub fn new(
        config: &'a Config,
        driver: &'a D,
        images: &'a ImageStore,
        sink: &'a mut S,
    ) -> crate::Result<Self> {
        let base_url = Url::parse(&config.site.base_url)?;

        Ok(Self {
            config,
            driver,
            images,
            sink,
            base_url,
            config_hash: String::new(),
        })
    }

    /// Sets the configuration hash reported in run statistics
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - Every discovered category was walked or skipped
    /// * `Err(CatalogError)` - The entry page was unreachable or the sink failed
    pub async fn run(self) -> crate::Result<CrawlStats> {
        let Self {
            config,
            driver,
            images,
            sink,
            base_url,
            config_hash,
        } = self;

        let start_time = Instant::now();
        let mut stats = CrawlStats::new();
        stats.started_at = Utc::now().to_rfc3339();
        stats.config_hash = config_hash;

        open_entry(driver, config).await?;

        let categories = discover_categories(driver, config, &base_url).await;
        stats.categories_discovered = categories.len() as u64;
        tracing::info!("Discovered {} categories", categories.len());

        let walker = PaginationWalker::new(driver, &config.selectors, &config.timing);
        let extractor = RecordExtractor::new(&config.selectors, &config.badges, &base_url, images);

        for (index, category) in categories.iter().enumerate() {
            tracing::info!(
                "Processing category {}/{}: {}",
                index + 1,
                categories.len(),
                category.name
            );

            let report = walker.walk(category, &extractor, &mut *sink, &mut stats).await?;
            stats.record_category(CategoryStats {
                name: category.name.clone(),
                pages: report.pages,
                records: report.records,
                skipped: report.skipped,
            });
        }

        sink.finish()?;

        stats.finished_at = Some(Utc::now().to_rfc3339());
        stats.duration_seconds = Some(start_time.elapsed().as_secs());

        tracing::info!(
            "Crawl complete: {} records from {} categories ({} skipped), {} images saved, {} failed",
            stats.records,
            stats.categories_crawled,
            stats.categories_skipped,
            stats.images_saved,
            stats.images_failed
        );

        Ok(stats)
    }
}

/// Opens the entry page and waits for registration and rendering
async fn open_entry<D: BrowserDriver>(driver: &D, config: &Config) -> crate::Result<()> {
    let url = &config.site.entry_url;
    tracing::info!("Opening {}", url);

    let unreachable = |source: DriverError| CatalogError::EntryUnreachable {
        url: url.clone(),
        source,
    };
    driver.goto(url).await.map_err(unreachable)?;
    driver
        .wait_for_load(config.timing.load_timeout())
        .await
        .map_err(unreachable)?;

    let registration = config.timing.registration_wait();
    if !registration.is_zero() {
        tracing::info!(
            "Waiting {}s for manual registration in the browser",
            registration.as_secs()
        );
        tokio::time::sleep(registration).await;
    }
    tokio::time::sleep(config.timing.settle_delay()).await;

    Ok(())
}

/// Reads the navigation and filters it down to crawlable categories
///
/// A navigation that cannot be read yields no categories.
async fn discover_categories<D: BrowserDriver>(
    driver: &D,
    config: &Config,
    base_url: &Url,
) -> Vec<Category> {
    let links = match read_sidebar_links(driver, &config.selectors.category_links).await {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!("Could not read category navigation: {}", e);
            return Vec::new();
        }
    };
    tracing::debug!("Found {} navigation links", links.len());

    discover(
        &links,
        &config.site.excluded_categories,
        &config.site.catalog_path_marker,
        base_url,
    )
}

/// Runs a complete crawl with a real browser
///
/// Builds the sink and image store from `config`, launches Chromium, crawls,
/// closes the browser and writes the Markdown summary when configured.
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `config_hash` - Hash of the configuration file
pub async fn run_crawl(config: &Config, config_hash: &str) -> crate::Result<CrawlStats> {
    let mut sink = build_sink(&config.output, config_hash)?;

    let client = build_http_client(&config.http, config.timing.image_timeout())?;
    let images = ImageStore::new(client, &config.output.image_dir);

    let driver = ChromiumDriver::launch(&config.browser, config.timing.load_timeout()).await?;

    let result = match Coordinator::new(config, &driver, &images, &mut *sink) {
        Ok(coordinator) => coordinator.with_config_hash(config_hash).run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = driver.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }

    let stats = result?;

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&stats, Path::new(path))?;
        tracing::info!("Summary written to {}", path);
    }

    Ok(stats)
}
