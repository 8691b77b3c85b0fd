//! Plan image downloads.
//!
//! A failed download never aborts the batch: every entry yields a
//! [`LoadOutcome`], and it is up to the compositor to drop the failures.

use crate::{Error, Result, ServiceConfig, TimetableEntry};
use image::RgbaImage;
use reqwest::blocking::Client;

/// Why a single image could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Connection refused, DNS failure, reset, ...
    Transport(String),
    /// The server answered with a non-success status
    Status(u16),
    /// The body is not a supported raster image
    Decode(String),
    /// No answer within the configured timeout
    Timeout(u64),
}

/// A failed load, kept together with the URL for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub url: String,
    pub reason: FailureReason,
}

impl LoadFailure {
    /// The error this failure would be if it were fatal
    pub fn to_error(&self) -> Error {
        match &self.reason {
            FailureReason::Transport(msg) => {
                Error::ImageDownloadError(format!("{}: {}", self.url, msg))
            }
            FailureReason::Status(code) => {
                Error::ImageDownloadError(format!("{}: HTTP status {}", self.url, code))
            }
            FailureReason::Decode(msg) => Error::ImageDecodeError(format!("{}: {}", self.url, msg)),
            FailureReason::Timeout(ms) => Error::Timeout(*ms),
        }
    }
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            FailureReason::Timeout(ms) => write!(f, "{}: timed out after {}ms", self.url, ms),
            _ => write!(f, "{}", self.to_error()),
        }
    }
}

/// Result of loading one entry's image
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(RgbaImage),
    Failed(LoadFailure),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    pub fn into_image(self) -> Option<RgbaImage> {
        match self {
            LoadOutcome::Loaded(img) => Some(img),
            LoadOutcome::Failed(_) => None,
        }
    }
}

/// Decode raster bytes; the format is sniffed from the content.
pub fn decode_image(bytes: &[u8]) -> std::result::Result<RgbaImage, String> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

/// Downloads plan images over HTTP
pub struct ImageLoader {
    client: Client,
    timeout_ms: u64,
}

impl ImageLoader {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                Error::ImageDownloadError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
        })
    }

    fn fail(url: &str, reason: FailureReason) -> LoadOutcome {
        LoadOutcome::Failed(LoadFailure {
            url: url.to_string(),
            reason,
        })
    }

    fn transport(&self, url: &str, err: reqwest::Error) -> LoadOutcome {
        if err.is_timeout() {
            Self::fail(url, FailureReason::Timeout(self.timeout_ms))
        } else {
            Self::fail(url, FailureReason::Transport(err.to_string()))
        }
    }

    /// GET `url` and decode the body. Never fails; see [`LoadOutcome`].
    pub fn load(&self, url: &str) -> LoadOutcome {
        let res = match self.client.get(url).send() {
            Ok(res) => res,
            Err(e) => return self.transport(url, e),
        };

        let status = res.status();
        if !status.is_success() {
            return Self::fail(url, FailureReason::Status(status.as_u16()));
        }

        let body = match res.bytes() {
            Ok(body) => body,
            Err(e) => return self.transport(url, e),
        };

        match decode_image(&body) {
            Ok(img) => {
                log::debug!("Loaded {} ({}x{})", url, img.width(), img.height());
                LoadOutcome::Loaded(img)
            }
            Err(msg) => Self::fail(url, FailureReason::Decode(msg)),
        }
    }

    /// Load every entry's image sequentially, in entry order.
    pub fn load_all(&self, entries: &[&TimetableEntry]) -> Vec<LoadOutcome> {
        entries.iter().map(|e| self.load(&e.image_url)).collect()
    }
}
