//! Markdown summary generation

use crate::output::stats::CrawlStats;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the Markdown summary of a run to `output_path`
///
/// # Arguments
///
/// * `stats` - Statistics of the finished run
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(stats: &CrawlStats, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStats) -> String {
    let mut md = String::new();

    md.push_str("# Catalog Harvest Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", stats.started_at));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = stats.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", stats.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Categories**: {} discovered, {} crawled, {} skipped\n",
        stats.categories_discovered, stats.categories_crawled, stats.categories_skipped
    ));
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.pages_visited));
    md.push_str(&format!("- **Records**: {}\n", stats.records));
    md.push_str(&format!(
        "- **Records Without Price**: {} ({:.2}% priced)\n",
        stats.prices_missing,
        stats.priced_rate()
    ));
    md.push_str(&format!("- **Flagged by Badge**: {}\n", stats.flagged));
    md.push_str(&format!(
        "- **Images**: {} saved, {} failed\n\n",
        stats.images_saved, stats.images_failed
    ));

    if !stats.categories.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Pages | Records | Status |\n");
        md.push_str("|----------|-------|---------|--------|\n");
        for category in &stats.categories {
            let status = match &category.skipped {
                Some(reason) => format!("skipped: {}", reason.replace('|', "\\|")),
                None => "done".to_string(),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                category.name, category.pages, category.records, status
            ));
        }
        md.push('\n');
    }

    md
}
