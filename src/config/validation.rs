use crate::config::types::{
    BadgeConfig, Config, OutputConfig, SelectorConfig, SiteConfig, TimingConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_selectors(&config.selectors)?;
    validate_badge_config(&config.badges)?;
    validate_timing_config(&config.timing)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("entry-url", &config.entry_url)?;
    validate_http_url("base-url", &config.base_url)?;

    if config.catalog_path_marker.is_empty() {
        return Err(ConfigError::Validation(
            "catalog-path-marker cannot be empty".to_string(),
        ));
    }

    if let Some(blank) = config
        .excluded_categories
        .iter()
        .find(|name| name.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "excluded-categories cannot contain blank names, got '{}'",
            blank
        )));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// Checks every selector parses as CSS before a browser is launched
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("category-links", &config.category_links),
        ("product-card", &config.product_card),
        ("title", &config.title),
        ("color", &config.color),
        ("price", &config.price),
        ("badge", &config.badge),
        ("link", &config.link),
        ("image", &config.image),
        ("next-page", &config.next_page),
    ];

    for (field, selector) in selectors {
        if selector.trim().is_empty() || Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                field: field.to_string(),
                selector: selector.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates badge markers
fn validate_badge_config(config: &BadgeConfig) -> Result<(), ConfigError> {
    for marker in &config.markers {
        if marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "badge markers cannot be empty".to_string(),
            ));
        }

        // Badge text is lower-cased before matching
        if marker.to_lowercase() != *marker {
            return Err(ConfigError::Validation(format!(
                "badge marker '{}' must be lower-case",
                marker
            )));
        }
    }

    if config.highlight_style.trim().is_empty() {
        return Err(ConfigError::Validation(
            "highlight-style cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates waits and bounds
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    if config.load_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "load-timeout must be >= 100ms, got {}ms",
            config.load_timeout
        )));
    }

    if config.image_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "image-timeout must be >= 100ms, got {}ms",
            config.image_timeout
        )));
    }

    if config.max_pages_per_category < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-per-category must be >= 1, got {}",
            config.max_pages_per_category
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.export_path.is_empty() {
        return Err(ConfigError::Validation(
            "export-path cannot be empty".to_string(),
        ));
    }

    if config.image_dir.is_empty() {
        return Err(ConfigError::Validation(
            "image-dir cannot be empty".to_string(),
        ));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
