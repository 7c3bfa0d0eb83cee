//! Per-item record extraction
//!
//! Turns one rendered product card into a `ProductRecord`. Extraction never
//! fails: a field that is missing or unreadable falls back to its default
//! and the problem is logged with the category, page, item and field.

use crate::config::{BadgeConfig, SelectorConfig};
use crate::crawler::images::{sanitize_image_name, ImageStore};
use crate::driver::{child_attribute, child_text, DriverResult, ElementHandle};
use crate::model::ProductRecord;
use crate::price::parse_price;
use crate::url::resolve_url;
use url::Url;

/// Title used when a card has none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Color used when a card has none
pub const DEFAULT_COLOR: &str = "Unspecified";

/// Raw price text used when a card has none
pub const DEFAULT_PRICE_TEXT: &str = "-";

/// Where an item sits in the crawl, for log context
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    pub category: &'a str,
    pub page: u32,
    pub index: usize,
}

/// What happened to an item's image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The card has no usable image source
    Absent,
    /// Image cached locally
    Saved,
    /// Image source present but download or conversion failed
    Failed,
}

/// Result of extracting one card
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedItem {
    pub record: ProductRecord,
    /// Promotional badge matched; highlight applied, record unchanged
    pub flagged: bool,
    pub image: ImageOutcome,
}

/// Extracts product records from rendered cards
pub struct RecordExtractor<'a> {
    selectors: &'a SelectorConfig,
    badges: &'a BadgeConfig,
    base_url: &'a Url,
    images: &'a ImageStore,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(
        selectors: &'a SelectorConfig,
        badges: &'a BadgeConfig,
        base_url: &'a Url,
        images: &'a ImageStore,
    ) -> Self {
        Self {
            selectors,
            badges,
            base_url,
            images,
        }
    }

    /// Extracts one card into a record
    ///
    /// Reads only from `card`, except for the cosmetic highlight applied to
    /// flagged cards. Holds no state between calls.
    pub async fn extract<E: ElementHandle>(&self, ctx: ItemContext<'_>, card: &E) -> ExtractedItem {
        let title = field_or(ctx, "title", child_text(card, &self.selectors.title).await)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let color = field_or(ctx, "color", child_text(card, &self.selectors.color).await)
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());

        let price_text = field_or(ctx, "price", child_text(card, &self.selectors.price).await)
            .unwrap_or_else(|| DEFAULT_PRICE_TEXT.to_string());

        let flagged = self.check_badge(ctx, card, &title).await;

        let price = parse_price(&price_text);
        if price.is_none() {
            tracing::debug!(
                "[{} p{} #{}] price {:?} not numeric",
                ctx.category,
                ctx.page,
                ctx.index + 1,
                price_text
            );
        }

        let link = field_or(
            ctx,
            "link",
            child_attribute(card, &self.selectors.link, "href").await,
        )
        .and_then(|href| resolve_url(self.base_url, &href))
        .unwrap_or_default();

        let image_url = field_or(
            ctx,
            "image",
            child_attribute(card, &self.selectors.image, "src").await,
        )
        .and_then(|src| resolve_url(self.base_url, &src));

        let (image_path, image) = match image_url {
            Some(url) => {
                let path = self.images.acquire(&url, &sanitize_image_name(&title)).await;
                if path.is_empty() {
                    (path, ImageOutcome::Failed)
                } else {
                    (path, ImageOutcome::Saved)
                }
            }
            None => (String::new(), ImageOutcome::Absent),
        };

        ExtractedItem {
            record: ProductRecord {
                category: ctx.category.to_string(),
                title,
                color,
                price,
                link,
                image_path,
            },
            flagged,
            image,
        }
    }

    /// Highlights cards whose badge carries an on-order or sale marker
    async fn check_badge<E: ElementHandle>(&self, ctx: ItemContext<'_>, card: &E, title: &str) -> bool {
        let badge = field_or(ctx, "badge", child_text(card, &self.selectors.badge).await);
        let Some(badge) = badge else {
            return false;
        };

        let badge = badge.to_lowercase();
        if !self.badges.markers.iter().any(|marker| badge.contains(marker.as_str())) {
            return false;
        }

        tracing::info!(
            "[{} p{} #{}] {} flagged by badge '{}'",
            ctx.category,
            ctx.page,
            ctx.index + 1,
            title,
            badge
        );

        if let Err(e) = card.set_style(&self.badges.highlight_style).await {
            tracing::warn!(
                "[{} p{} #{}] highlight failed: {}",
                ctx.category,
                ctx.page,
                ctx.index + 1,
                e
            );
        }

        true
    }
}

/// Unwraps a field read, logging and defaulting on driver errors
fn field_or(ctx: ItemContext<'_>, field: &str, value: DriverResult<Option<String>>) -> Option<String> {
    match value {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "[{} p{} #{}] field '{}' unreadable, using default: {}",
                ctx.category,
                ctx.page,
                ctx.index + 1,
                field,
                e
            );
            None
        }
    }
}
