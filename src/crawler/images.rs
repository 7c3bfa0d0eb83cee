//! Image acquisition
//!
//! This module downloads product images and caches them locally:
//! - building the HTTP client used for image downloads
//! - fetching with a bounded timeout
//! - decoding, converting to 3-channel RGB and re-encoding as WebP
//! - writing atomically so failures never leave partial files
//!
//! A failed download is never fatal: the caller receives an empty path and
//! still emits the record.

use crate::config::HttpConfig;
use crate::output::write_atomic;
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Extension of every cached image
pub const IMAGE_EXTENSION: &str = "webp";

/// Maximum length of a sanitized image name, in characters
pub const MAX_IMAGE_NAME_CHARS: usize = 50;

/// Reasons an image could not be cached
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoder task failed: {0}")]
    Task(String),
}

/// Builds the HTTP client used for image downloads
///
/// # Arguments
///
/// * `config` - HTTP options (user agent)
/// * `timeout` - Upper bound for a whole request
pub fn build_http_client(config: &HttpConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Turns a product title into a file-name-safe image name
///
/// Whitespace and path-unsafe characters become `_` and the result is cut to
/// 50 characters. Distinct titles can collapse to the same name; the last
/// image written under a name wins.
///
/// # Examples
///
/// ```
/// use catalog_harvester::crawler::sanitize_image_name;
///
/// assert_eq!(sanitize_image_name("Model X"), "Model_X");
/// assert_eq!(sanitize_image_name("Door 60/200"), "Door_60_200");
/// ```
pub fn sanitize_image_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| if is_unsafe(c) { '_' } else { c })
        .take(MAX_IMAGE_NAME_CHARS)
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        "_".to_string()
    } else {
        name
    }
}

fn is_unsafe(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Path of the cached image for `name` inside `dir`
pub fn image_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, IMAGE_EXTENSION))
}

/// Downloads and caches product images under one directory
pub struct ImageStore {
    client: Client,
    dir: PathBuf,
}

impl ImageStore {
    /// Creates a store writing into `dir`
    ///
    /// The directory is created on first use, never cleaned up.
    pub fn new(client: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    /// Fetches `url` and stores it as `<name>.webp`
    ///
    /// Returns the local path, or an empty string when anything fails.
    pub async fn acquire(&self, url: &str, name: &str) -> String {
        match self.try_acquire(url, name).await {
            Ok(path) => {
                tracing::debug!("Cached image {} -> {}", url, path.display());
                path.to_string_lossy().into_owned()
            }
            Err(e) => {
                tracing::warn!("Failed to cache image {}: {}", url, e);
                String::new()
            }
        }
    }

    /// Fetches, converts and stores one image
    pub async fn try_acquire(&self, url: &str, name: &str) -> Result<PathBuf, ImageError> {
        let bytes = self.fetch(url).await?;

        let target = image_path(&self.dir, name);
        let target_for_task = target.clone();

        // Decoding and encoding are CPU-bound
        tokio::task::spawn_blocking(move || store_as_webp(&bytes, &target_for_task))
            .await
            .map_err(|e| ImageError::Task(e.to_string()))??;

        Ok(target)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(classify)?;
        Ok(bytes.to_vec())
    }
}

fn classify(e: reqwest::Error) -> ImageError {
    if e.is_timeout() {
        ImageError::Timeout
    } else {
        ImageError::Transport(e)
    }
}

/// Decodes `bytes`, drops any alpha channel and writes WebP to `target`
///
/// `target` is either complete or untouched; its directory is created on
/// first use.
fn store_as_webp(bytes: &[u8], target: &Path) -> Result<(), ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::WebP)?;

    write_atomic(target, encoded.get_ref())?;
    Ok(())
}
