//! Catalog Harvester main entry point
//!
//! This is the command-line interface for the catalog crawler.

use catalog_harvester::config::{load_config_with_hash, Config, OutputFormat};
use catalog_harvester::crawler::run_crawl;
use catalog_harvester::output::print_statistics;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog Harvester: a product catalog crawler
///
/// Opens the catalog in a browser, walks every category page by page,
/// exports one record per product with the marked-up price and caches the
/// product images as WebP files.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version)]
#[command(about = "A product catalog crawler for JavaScript-rendered shops", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without launching a browser
    #[arg(long)]
    dry_run: bool,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using built-in defaults"),
    }
    let (mut config, config_hash) = match load_config_with_hash(cli.config.as_deref()) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.headless {
        config.browser.headless = true;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, &config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvester=info,warn"),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Catalog Harvester Dry Run ===\n");

    println!("Site:");
    println!("  Entry URL: {}", config.site.entry_url);
    println!("  Base URL: {}", config.site.base_url);
    println!("  Catalog path marker: {}", config.site.catalog_path_marker);

    println!(
        "\nExcluded Categories ({}):",
        config.site.excluded_categories.len()
    );
    for name in &config.site.excluded_categories {
        println!("  - {}", name);
    }

    println!("\nSelectors:");
    println!("  Category links: {}", config.selectors.category_links);
    println!("  Product card: {}", config.selectors.product_card);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\nBadge markers: {}", config.badges.markers.join(", "));

    println!("\nTiming:");
    println!("  Registration wait: {}ms", config.timing.registration_wait);
    println!("  Settle delay: {}ms", config.timing.settle_delay);
    println!("  Load timeout: {}ms", config.timing.load_timeout);
    println!("  Image timeout: {}ms", config.timing.image_timeout);
    println!(
        "  Max pages per category: {}",
        config.timing.max_pages_per_category
    );

    println!(
        "\nBrowser: {}",
        if config.browser.headless { "headless" } else { "headed" }
    );

    println!("\nOutput:");
    match config.output.format {
        OutputFormat::Csv => println!("  CSV: {}", config.output.export_path),
        OutputFormat::Sqlite => println!("  SQLite: {}", config.output.database_path),
    }
    println!("  Images: {}", config.output.image_dir);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting crawl at {} ({} excluded categories)",
        config.site.entry_url,
        config.site.excluded_categories.len()
    );

    match run_crawl(config, config_hash).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            if !quiet {
                println!();
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
