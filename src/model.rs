//! Data model shared by the crawler and the output sinks

/// A named catalog subdivision with its own listing URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Display name as shown in the site navigation
    pub name: String,

    /// Absolute listing URL
    pub url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One extracted catalog item
///
/// `price` is `None` when the displayed price could not be parsed; that is a
/// valid outcome, not an error. `image_path` is empty when no image was cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub category: String,
    pub title: String,
    pub color: String,
    pub price: Option<f64>,
    pub link: String,
    pub image_path: String,
}

impl ProductRecord {
    /// Formats the price for tabular output (empty cell when unknown)
    pub fn price_cell(&self) -> String {
        self.price.map(|p| p.to_string()).unwrap_or_default()
    }
}
