//! Category discovery from the site navigation

use crate::driver::{BrowserDriver, ElementHandle};
use crate::model::Category;
use crate::url::resolve_url;
use std::collections::HashSet;
use url::Url;

/// Raw navigation anchor as read from the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarLink {
    pub href: Option<String>,
    pub text: Option<String>,
}

impl SidebarLink {
    pub fn new(href: &str, text: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            text: Some(text.to_string()),
        }
    }
}

/// Filters navigation anchors down to crawlable categories
///
/// An anchor is kept iff its href is non-empty, its text is non-empty, the
/// href contains `path_marker`, and its lower-cased text is not one of the
/// lower-cased `excluded` names (exact match, not substring). Hrefs are
/// resolved against `base`. Order is preserved.
pub fn discover(
    links: &[SidebarLink],
    excluded: &[String],
    path_marker: &str,
    base: &Url,
) -> Vec<Category> {
    let excluded: HashSet<String> = excluded.iter().map(|name| name.trim().to_lowercase()).collect();

    links
        .iter()
        .filter_map(|link| {
            let href = link.href.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
            let name = link.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;

            if !href.contains(path_marker) {
                tracing::trace!("Skipping non-catalog link {} ({})", name, href);
                return None;
            }

            if excluded.contains(&name.to_lowercase()) {
                tracing::debug!("Excluding category {}", name);
                return None;
            }

            let url = resolve_url(base, href)?;
            Some(Category::new(name, url))
        })
        .collect()
}

/// Reads the navigation anchors matching `selector` from the current page
///
/// An anchor whose attributes cannot be read is kept with the missing parts
/// set to `None`, which `discover` then drops.
pub async fn read_sidebar_links<D: BrowserDriver>(
    driver: &D,
    selector: &str,
) -> crate::Result<Vec<SidebarLink>> {
    let anchors = driver.query_all(selector).await?;
    let mut links = Vec::with_capacity(anchors.len());

    for (index, anchor) in anchors.iter().enumerate() {
        let href = anchor.attribute("href").await.unwrap_or_else(|e| {
            tracing::warn!("Navigation link {}: unreadable href: {}", index, e);
            None
        });
        let text = anchor.text().await.unwrap_or_else(|e| {
            tracing::warn!("Navigation link {}: unreadable text: {}", index, e);
            None
        });
        links.push(SidebarLink { href, text });
    }

    Ok(links)
}
