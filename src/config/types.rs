use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Catalog Harvester
///
/// Every section has defaults, so an empty file (or no file at all) gives the
/// stock configuration for the catalog this tool was written for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub badges: BadgeConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page opened first; failing to reach it aborts the run
    #[serde(rename = "entry-url")]
    pub entry_url: String,

    /// Base URL used to resolve relative category, product and image links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path fragment a navigation href must contain to count as a category
    #[serde(rename = "catalog-path-marker")]
    pub catalog_path_marker: String,

    /// Category names to skip (case-insensitive, exact match)
    #[serde(rename = "excluded-categories")]
    pub excluded_categories: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            entry_url: "https://dveri.com/".to_string(),
            base_url: "https://dveri.com/catalog/dveri-mezhkomnatnyye".to_string(),
            catalog_path_marker: "/catalog/".to_string(),
            excluded_categories: vec![
                "Арки и порталы".to_string(),
                "Плинтус".to_string(),
                "Деко Рейка".to_string(),
                "Фурнитура и прочее".to_string(),
                "Монтаж и реставрация".to_string(),
                "В помощь продавцам".to_string(),
            ],
        }
    }
}

/// CSS selectors for the catalog markup
///
/// Card-level selectors (`title` through `image`) are evaluated inside one
/// product card; the others against the whole page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Category anchors in the site navigation
    #[serde(rename = "category-links")]
    pub category_links: String,

    /// Product card container
    #[serde(rename = "product-card")]
    pub product_card: String,

    pub title: String,

    pub color: String,

    pub price: String,

    /// Promotional badge inside a card
    pub badge: String,

    /// Product link (the first match is used)
    pub link: String,

    /// Product image element carrying `src`
    pub image: String,

    /// Enabled "next page" control
    #[serde(rename = "next-page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_links: "ul.sidebar__list a".to_string(),
            product_card: ".card".to_string(),
            title: ".card__title".to_string(),
            color: ".card__color".to_string(),
            price: ".card__price".to_string(),
            badge: ".badge--card".to_string(),
            link: "a".to_string(),
            image: ".card__img-wrapper img".to_string(),
            next_page: ".pagination__arrow--right:not(.disabled)".to_string(),
        }
    }
}

/// Promotional badge handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    /// Lower-case substrings that flag a badge ("on-order", "sale")
    pub markers: Vec<String>,

    /// Inline style appended to flagged cards
    #[serde(rename = "highlight-style")]
    pub highlight_style: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            markers: vec![
                "на заказ".to_string(),
                "on order".to_string(),
                "on-order".to_string(),
                "sale".to_string(),
            ],
            highlight_style: "background-color: black; color: white;".to_string(),
        }
    }
}

/// Named waits and bounds (all durations in milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause after opening the entry page so an operator can log in
    #[serde(rename = "registration-wait")]
    pub registration_wait: u64,

    /// Fixed settle delay after navigation and after pagination clicks
    #[serde(rename = "settle-delay")]
    pub settle_delay: u64,

    /// Upper bound for a page load to complete
    #[serde(rename = "load-timeout")]
    pub load_timeout: u64,

    /// Upper bound for one image download
    #[serde(rename = "image-timeout")]
    pub image_timeout: u64,

    /// Maximum listing pages walked per category
    #[serde(rename = "max-pages-per-category")]
    pub max_pages_per_category: u32,
}

impl TimingConfig {
    pub fn registration_wait(&self) -> Duration {
        Duration::from_millis(self.registration_wait)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            registration_wait: 10_000,
            settle_delay: 3_000,
            load_timeout: 30_000,
            image_timeout: 10_000,
            max_pages_per_category: 500,
        }
    }
}

/// Browser launch options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run without a visible window (no manual registration possible)
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self { headless: false }
    }
}

/// HTTP client options for image downloads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("catalog-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Export format of the result sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Path of the CSV export
    #[serde(rename = "export-path")]
    pub export_path: String,

    /// Directory receiving `<name>.webp` files
    #[serde(rename = "image-dir")]
    pub image_dir: String,

    /// Path to the SQLite database file (used with `format = "sqlite"`)
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Optional markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            export_path: "dveri_products.csv".to_string(),
            image_dir: "images".to_string(),
            database_path: "dveri_products.db".to_string(),
            summary_path: None,
        }
    }
}
