//! Pagination walker
//!
//! Drives one category through its listing pages:
//!
//! ```text
//! Loading -> Ready -> (Extracting -> Ready)* -> Exhausted
//! ```
//!
//! Every transition goes through `WalkState::transition`. Records are handed
//! to the sink in DOM order, page by page, as soon as they are extracted.

use crate::config::{SelectorConfig, TimingConfig};
use crate::crawler::extractor::{ItemContext, RecordExtractor};
use crate::driver::{BrowserDriver, DriverResult, ElementHandle};
use crate::model::Category;
use crate::output::{CrawlStats, ResultSink};
use crate::state::WalkState;

/// How a category walk ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Listing pages rendered
    pub pages: u32,
    /// Records handed to the sink
    pub records: u64,
    /// Why the category was skipped; `None` when it was walked
    pub skipped: Option<String>,
}

/// Walks the listing pages of one category at a time
pub struct PaginationWalker<'a, D: BrowserDriver> {
    driver: &'a D,
    selectors: &'a SelectorConfig,
    timing: &'a TimingConfig,
}

impl<'a, D: BrowserDriver> PaginationWalker<'a, D> {
    pub fn new(driver: &'a D, selectors: &'a SelectorConfig, timing: &'a TimingConfig) -> Self {
        Self {
            driver,
            selectors,
            timing,
        }
    }

    /// Walks `category` until its last page
    ///
    /// Navigation problems never fail the walk: a category that cannot be
    /// loaded is skipped and a page that cannot be reached ends the category.
    /// Only sink errors and state machine violations are returned.
    pub async fn walk<S: ResultSink + ?Sized>(
        &self,
        category: &Category,
        extractor: &RecordExtractor<'_>,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> crate::Result<WalkReport> {
        let mut report = WalkReport::default();
        let mut state = WalkState::Loading;
        let mut cards: Vec<D::Element> = Vec::new();

        while !state.is_terminal() {
            tracing::trace!("[{}] state {}", category.name, state);

            state = match state {
                WalkState::Loading => match self.load(category).await {
                    Ok(()) => state.transition(WalkState::Ready)?,
                    Err(e) => {
                        tracing::warn!("[{}] skipping category: {}", category.name, e);
                        report.skipped = Some(e.to_string());
                        state.transition(WalkState::Exhausted)?
                    }
                },

                WalkState::Ready => {
                    report.pages += 1;
                    stats.pages_visited += 1;

                    match self.driver.query_all(&self.selectors.product_card).await {
                        Ok(found) if found.is_empty() => {
                            tracing::info!("[{}] page {}: no items", category.name, report.pages);
                            state.transition(WalkState::Exhausted)?
                        }
                        Ok(found) => {
                            tracing::info!(
                                "[{}] page {}: {} items",
                                category.name,
                                report.pages,
                                found.len()
                            );
                            cards = found;
                            state.transition(WalkState::Extracting)?
                        }
                        Err(e) => {
                            tracing::warn!(
                                "[{}] page {}: item query failed, ending category: {}",
                                category.name,
                                report.pages,
                                e
                            );
                            state.transition(WalkState::Exhausted)?
                        }
                    }
                }

                WalkState::Extracting => {
                    for (index, card) in cards.iter().enumerate() {
                        let ctx = ItemContext {
                            category: &category.name,
                            page: report.pages,
                            index,
                        };
                        let item = extractor.extract(ctx, card).await;
                        stats.record_item(&item);
                        sink.append(item.record)?;
                        report.records += 1;
                    }

                    // Handles belong to the page being left
                    cards.clear();

                    if self.next_page(category, report.pages).await {
                        state.transition(WalkState::Ready)?
                    } else {
                        state.transition(WalkState::Exhausted)?
                    }
                }

                WalkState::Exhausted => state,
            };
        }

        tracing::info!(
            "[{}] done: {} pages, {} records",
            category.name,
            report.pages,
            report.records
        );
        Ok(report)
    }

    /// Opens the category URL, retrying the whole step once
    async fn load(&self, category: &Category) -> DriverResult<()> {
        match self.try_load(&category.url).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("[{}] load failed, retrying once: {}", category.name, e);
                self.try_load(&category.url).await
            }
        }
    }

    async fn try_load(&self, url: &str) -> DriverResult<()> {
        self.driver.goto(url).await?;
        self.driver.wait_for_load(self.timing.load_timeout()).await?;
        tokio::time::sleep(self.timing.settle_delay()).await;
        Ok(())
    }

    /// Activates the "next page" control
    ///
    /// Returns false when there is no further page to render: the control is
    /// absent or disabled, the page bound is reached, the click fails, or the
    /// new page does not settle after one retry of the wait. The click itself
    /// is never repeated.
    async fn next_page(&self, category: &Category, page: u32) -> bool {
        if page >= self.timing.max_pages_per_category {
            tracing::warn!(
                "[{}] reached the limit of {} pages, ending category",
                category.name,
                self.timing.max_pages_per_category
            );
            return false;
        }

        let next = match self.driver.query(&self.selectors.next_page).await {
            Ok(Some(next)) => next,
            Ok(None) => {
                tracing::debug!("[{}] page {} is the last page", category.name, page);
                return false;
            }
            Err(e) => {
                tracing::warn!("[{}] next-page lookup failed: {}", category.name, e);
                return false;
            }
        };

        if let Err(e) = next.click().await {
            tracing::warn!("[{}] next-page click failed: {}", category.name, e);
            return false;
        }
        drop(next);

        tokio::time::sleep(self.timing.settle_delay()).await;

        for attempt in 1..=2 {
            match self.driver.wait_for_load(self.timing.load_timeout()).await {
                Ok(()) => return true,
                Err(e) if attempt == 1 => {
                    tracing::warn!(
                        "[{}] page {} did not settle, waiting once more: {}",
                        category.name,
                        page + 1,
                        e
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "[{}] page {} did not settle, ending category: {}",
                        category.name,
                        page + 1,
                        e
                    );
                }
            }
        }
        false
    }
}
