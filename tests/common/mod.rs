//! Shared fixtures for the integration tests
//!
//! `FakeSite` describes a rendered catalog in memory: a navigation sidebar
//! and, per category URL, a list of listing pages. `FakeDriver` serves it
//! through the browser driver traits, answering the default selectors.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_harvester::config::{Config, SelectorConfig};
use catalog_harvester::crawler::{build_http_client, ImageStore};
use catalog_harvester::driver::{BrowserDriver, DriverError, DriverResult, ElementHandle};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SITE_ORIGIN: &str = "https://example.test";
pub const ENTRY_URL: &str = "https://example.test/";
pub const BASE_URL: &str = "https://example.test/catalog/doors";

/// Absolute URL of a site path
pub fn url_of(path: &str) -> String {
    format!("{}{}", SITE_ORIGIN, path)
}

/// Configuration pointing at the fake site with zero waits
pub fn test_config(image_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.entry_url = ENTRY_URL.to_string();
    config.site.base_url = BASE_URL.to_string();
    config.site.excluded_categories = vec!["Arches and Portals".to_string()];
    config.timing.registration_wait = 0;
    config.timing.settle_delay = 0;
    config.timing.load_timeout = 1_000;
    config.timing.image_timeout = 5_000;
    config.output.image_dir = image_dir.to_string_lossy().into_owned();
    config
}

/// Image store writing into `dir`
pub fn image_store(dir: &Path) -> ImageStore {
    let client = build_http_client(&Config::default().http, Duration::from_secs(5)).unwrap();
    ImageStore::new(client, dir)
}

/// A small PNG payload
pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(4, 4, image::Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A small JPEG payload
pub fn jpeg_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 6, image::Rgb([90, 60, 30]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

/// One product card as rendered on a listing page
#[derive(Debug, Clone, Default)]
pub struct FakeCard {
    pub title: Option<String>,
    pub color: Option<String>,
    pub price: Option<String>,
    pub badge: Option<String>,
    pub href: Option<String>,
    pub image: Option<String>,
    /// Title element exists but reading it fails
    pub broken_title: bool,
}

impl FakeCard {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn price(mut self, price: &str) -> Self {
        self.price = Some(price.to_string());
        self
    }

    pub fn badge(mut self, badge: &str) -> Self {
        self.badge = Some(badge.to_string());
        self
    }

    pub fn href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn image(mut self, src: &str) -> Self {
        self.image = Some(src.to_string());
        self
    }

    pub fn broken_title(mut self) -> Self {
        self.broken_title = true;
        self
    }
}

#[derive(Default)]
struct FakeState {
    selectors: SelectorConfig,
    sidebar: Vec<(Option<String>, Option<String>)>,
    catalogs: HashMap<String, Vec<Vec<FakeCard>>>,
    current_url: Option<String>,
    page_index: usize,
    goto_failures: HashMap<String, u32>,
    wait_failures: HashMap<(String, usize), u32>,
    visits: Vec<String>,
    clicks: usize,
    highlighted: Vec<(String, String)>,
}

/// In-memory catalog served by `FakeDriver`
pub struct FakeSite {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSite {
    pub fn new() -> Self {
        let state = FakeState {
            selectors: Config::default().selectors,
            ..FakeState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn with(self, f: impl FnOnce(&mut FakeState)) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            f(&mut *state);
        }
        self
    }

    /// Adds a sidebar entry and the listing pages served at its URL
    pub fn category(self, name: &str, path: &str, pages: Vec<Vec<FakeCard>>) -> Self {
        self.with(|s| {
            s.sidebar
                .push((Some(path.to_string()), Some(name.to_string())));
            s.catalogs.insert(url_of(path), pages);
        })
    }

    /// Adds a sidebar entry with an absolute href, served at that URL
    pub fn category_at(self, name: &str, url: &str, pages: Vec<Vec<FakeCard>>) -> Self {
        self.with(|s| {
            s.sidebar.push((Some(url.to_string()), Some(name.to_string())));
            s.catalogs.insert(url.to_string(), pages);
        })
    }

    /// Adds a raw sidebar anchor without any listing behind it
    pub fn link(self, href: Option<&str>, text: Option<&str>) -> Self {
        self.with(|s| {
            s.sidebar
                .push((href.map(str::to_string), text.map(str::to_string)))
        })
    }

    /// Makes the next `times` navigations to `url` fail
    pub fn fail_goto(self, url: &str, times: u32) -> Self {
        self.with(|s| {
            s.goto_failures.insert(url.to_string(), times);
        })
    }

    /// Makes the next `times` load waits on page `page_index` of `url` time out
    pub fn fail_wait(self, url: &str, page_index: usize, times: u32) -> Self {
        self.with(|s| {
            s.wait_failures.insert((url.to_string(), page_index), times);
        })
    }

    pub fn driver(&self) -> FakeDriver {
        FakeDriver {
            state: Arc::clone(&self.state),
        }
    }

    /// A standalone card element
    pub fn card(&self, card: FakeCard) -> FakeElement {
        FakeElement {
            kind: Kind::Card(card),
            state: Arc::clone(&self.state),
        }
    }

    /// Every URL passed to `goto`, in order
    pub fn visits(&self) -> Vec<String> {
        self.state.lock().unwrap().visits.clone()
    }

    pub fn visits_to(&self, url: &str) -> usize {
        self.visits().iter().filter(|v| v.as_str() == url).count()
    }

    /// Number of "next page" clicks
    pub fn clicks(&self) -> usize {
        self.state.lock().unwrap().clicks
    }

    /// `(title, css)` of every highlighted card
    pub fn highlighted(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().highlighted.clone()
    }
}

#[derive(Debug, Clone)]
enum Kind {
    Card(FakeCard),
    Text(String),
    Attr(&'static str, String),
    Anchor {
        href: Option<String>,
        text: Option<String>,
    },
    Next,
    Unreadable,
}

/// Element handle of the fake page
pub struct FakeElement {
    kind: Kind,
    state: Arc<Mutex<FakeState>>,
}

impl FakeElement {
    fn child(&self, kind: Kind) -> Self {
        Self {
            kind,
            state: Arc::clone(&self.state),
        }
    }

    fn unreadable() -> DriverError {
        DriverError::Interaction("node is detached from document".to_string())
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn find(&self, selector: &str) -> DriverResult<Option<Self>> {
        let Kind::Card(card) = &self.kind else {
            return Ok(None);
        };
        let sel = self.state.lock().unwrap().selectors.clone();

        let kind = if selector == sel.title {
            if card.broken_title {
                Some(Kind::Unreadable)
            } else {
                card.title.clone().map(Kind::Text)
            }
        } else if selector == sel.color {
            card.color.clone().map(Kind::Text)
        } else if selector == sel.price {
            card.price.clone().map(Kind::Text)
        } else if selector == sel.badge {
            card.badge.clone().map(Kind::Text)
        } else if selector == sel.link {
            card.href.clone().map(|href| Kind::Attr("href", href))
        } else if selector == sel.image {
            card.image.clone().map(|src| Kind::Attr("src", src))
        } else {
            None
        };

        Ok(kind.map(|kind| self.child(kind)))
    }

    async fn text(&self) -> DriverResult<Option<String>> {
        match &self.kind {
            Kind::Text(text) => Ok(Some(text.clone())),
            Kind::Anchor { text, .. } => Ok(text.clone()),
            Kind::Card(card) => Ok(card.title.clone()),
            Kind::Unreadable => Err(Self::unreadable()),
            Kind::Attr(..) | Kind::Next => Ok(None),
        }
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        match &self.kind {
            Kind::Attr(attr, value) if *attr == name => Ok(Some(value.clone())),
            Kind::Anchor { href, .. } if name == "href" => Ok(href.clone()),
            Kind::Unreadable => Err(Self::unreadable()),
            _ => Ok(None),
        }
    }

    async fn click(&self) -> DriverResult<()> {
        if let Kind::Next = self.kind {
            let mut s = self.state.lock().unwrap();
            s.page_index += 1;
            s.clicks += 1;
        }
        Ok(())
    }

    async fn set_style(&self, css: &str) -> DriverResult<()> {
        if let Kind::Card(card) = &self.kind {
            let title = card.title.clone().unwrap_or_default();
            self.state
                .lock()
                .unwrap()
                .highlighted
                .push((title, css.to_string()));
        }
        Ok(())
    }
}

/// Browser driver serving a `FakeSite`
#[derive(Clone)]
pub struct FakeDriver {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDriver {
    fn element(&self, kind: Kind) -> FakeElement {
        FakeElement {
            kind,
            state: Arc::clone(&self.state),
        }
    }

    fn has_next_page(&self) -> bool {
        let s = self.state.lock().unwrap();
        s.current_url
            .as_ref()
            .and_then(|url| s.catalogs.get(url))
            .map(|pages| s.page_index + 1 < pages.len())
            .unwrap_or(false)
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        let mut s = self.state.lock().unwrap();
        s.visits.push(url.to_string());

        if let Some(remaining) = s.goto_failures.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::Navigation {
                    url: url.to_string(),
                    message: "net::ERR_CONNECTION_RESET".to_string(),
                });
            }
        }

        s.current_url = Some(url.to_string());
        s.page_index = 0;
        Ok(())
    }

    async fn wait_for_load(&self, timeout: Duration) -> DriverResult<()> {
        let mut s = self.state.lock().unwrap();
        let key = (s.current_url.clone().unwrap_or_default(), s.page_index);

        if let Some(remaining) = s.wait_failures.get_mut(&key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::Timeout {
                    what: "page load".to_string(),
                    after: timeout,
                });
            }
        }
        Ok(())
    }

    async fn query(&self, selector: &str) -> DriverResult<Option<FakeElement>> {
        let next_selector = self.state.lock().unwrap().selectors.next_page.clone();
        if selector == next_selector {
            return Ok(self.has_next_page().then(|| self.element(Kind::Next)));
        }

        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<FakeElement>> {
        let kinds: Vec<Kind> = {
            let s = self.state.lock().unwrap();
            if selector == s.selectors.category_links {
                s.sidebar
                    .iter()
                    .map(|(href, text)| Kind::Anchor {
                        href: href.clone(),
                        text: text.clone(),
                    })
                    .collect()
            } else if selector == s.selectors.product_card {
                s.current_url
                    .as_ref()
                    .and_then(|url| s.catalogs.get(url))
                    .and_then(|pages| pages.get(s.page_index))
                    .map(|cards| cards.iter().cloned().map(Kind::Card).collect())
                    .unwrap_or_default()
            } else {
                Vec::new()
            }
        };

        Ok(kinds.into_iter().map(|kind| self.element(kind)).collect())
    }
}
