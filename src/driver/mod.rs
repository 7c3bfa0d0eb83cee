//! Browser driver capability interface
//!
//! The crawler never talks to a browser directly. It needs a handful of
//! capabilities (navigate, wait for a page to settle, query elements, read
//! text and attributes, click, apply an inline style) and any driver that
//! provides them is interchangeable:
//! - `ChromiumDriver` drives a real Chromium over CDP
//! - tests use an in-memory fake

mod chromium;

pub use chromium::ChromiumDriver;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a browser driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Element query '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    #[error("Element interaction failed: {0}")]
    Interaction(String),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// A rendered element owned by the driver
///
/// Handles are only valid for the page they were queried from; the walker
/// drops them before moving to the next page.
#[async_trait]
pub trait ElementHandle: Send + Sync + Sized {
    /// Returns the first descendant matching `selector`
    async fn find(&self, selector: &str) -> DriverResult<Option<Self>>;

    /// Returns the rendered inner text, if any
    async fn text(&self) -> DriverResult<Option<String>>;

    /// Returns the value of attribute `name`, if present
    async fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    /// Clicks the element
    async fn click(&self) -> DriverResult<()>;

    /// Appends `css` to the element's inline style
    async fn set_style(&self, css: &str) -> DriverResult<()>;
}

/// Page-level browser capabilities
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    type Element: ElementHandle;

    /// Navigates the page to `url`
    async fn goto(&self, url: &str) -> DriverResult<()>;

    /// Waits until the current navigation has loaded, bounded by `timeout`
    async fn wait_for_load(&self, timeout: Duration) -> DriverResult<()>;

    /// Returns the first element matching `selector` on the page
    async fn query(&self, selector: &str) -> DriverResult<Option<Self::Element>>;

    /// Returns all elements matching `selector` on the page, in DOM order
    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Self::Element>>;
}

/// Reads the trimmed text of the first descendant matching `selector`
///
/// Empty text counts as absent.
pub async fn child_text<E: ElementHandle>(
    element: &E,
    selector: &str,
) -> DriverResult<Option<String>> {
    let Some(child) = element.find(selector).await? else {
        return Ok(None);
    };

    Ok(child
        .text()
        .await?
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Reads attribute `name` of the first descendant matching `selector`
///
/// Empty values count as absent.
pub async fn child_attribute<E: ElementHandle>(
    element: &E,
    selector: &str,
    name: &str,
) -> DriverResult<Option<String>> {
    let Some(child) = element.find(selector).await? else {
        return Ok(None);
    };

    Ok(child
        .attribute(name)
        .await?
        .filter(|value| !value.trim().is_empty()))
}
