//! Chromium implementation of the driver capabilities
//!
//! Launches Chromium through `chromiumoxide`, keeps a single page open and
//! forwards every capability to CDP calls on that page.

use crate::config::BrowserConfig as BrowserOptions;
use crate::driver::{BrowserDriver, DriverError, DriverResult, ElementHandle};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Browser driver backed by a real Chromium instance
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumDriver {
    /// Launches Chromium and opens a blank page
    ///
    /// # Arguments
    ///
    /// * `options` - Browser options (headed or headless)
    /// * `navigation_timeout` - Upper bound for `goto` to finish loading
    pub async fn launch(
        options: &BrowserOptions,
        navigation_timeout: Duration,
    ) -> DriverResult<Self> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // The CDP event loop must be polled for any page call to complete
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        tracing::info!(
            "Browser launched ({})",
            if options.headless { "headless" } else { "headed" }
        );

        Ok(Self {
            browser,
            page,
            handler,
            navigation_timeout,
        })
    }

    /// Closes the browser and stops the event loop
    pub async fn close(mut self) -> DriverResult<()> {
        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Interaction(format!("close failed: {}", e)));

        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();

        result
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    type Element = ChromiumElement;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(DriverError::Timeout {
                what: format!("navigation to {}", url),
                after: self.navigation_timeout,
            }),
        }
    }

    async fn wait_for_load(&self, timeout: Duration) -> DriverResult<()> {
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(DriverError::Navigation {
                url: self.page.url().await.ok().flatten().unwrap_or_default(),
                message: e.to_string(),
            }),
            Err(_) => Err(DriverError::Timeout {
                what: "page load".to_string(),
                after: timeout,
            }),
        }
    }

    async fn query(&self, selector: &str) -> DriverResult<Option<ChromiumElement>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<ChromiumElement>> {
        self.page
            .find_elements(selector)
            .await
            .map(|elements| elements.into_iter().map(ChromiumElement).collect())
            .map_err(|e| DriverError::Query {
                selector: selector.to_string(),
                message: e.to_string(),
            })
    }
}

/// A DOM element on the driver's page
pub struct ChromiumElement(Element);

#[async_trait]
impl ElementHandle for ChromiumElement {
    async fn find(&self, selector: &str) -> DriverResult<Option<Self>> {
        // querySelectorAll reports "no match" as an empty list, not an error
        self.0
            .find_elements(selector)
            .await
            .map(|elements| elements.into_iter().next().map(ChromiumElement))
            .map_err(|e| DriverError::Query {
                selector: selector.to_string(),
                message: e.to_string(),
            })
    }

    async fn text(&self) -> DriverResult<Option<String>> {
        self.0
            .inner_text()
            .await
            .map_err(|e| DriverError::Interaction(format!("innerText: {}", e)))
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| DriverError::Interaction(format!("attribute {}: {}", name, e)))
    }

    async fn click(&self) -> DriverResult<()> {
        self.0
            .click()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Interaction(format!("click: {}", e)))
    }

    async fn set_style(&self, css: &str) -> DriverResult<()> {
        let function = format!(
            "function() {{ this.style.cssText += {:?}; }}",
            format!(";{}", css)
        );
        self.0
            .call_js_fn(function, false)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Interaction(format!("set style: {}", e)))
    }
}
