//! DSB Timetables
//!
//! Fetches the substitution plans a school publishes through DSBmobile,
//! stitches the "today" and "tomorrow" plans into one image and serves that
//! image over HTTP.
//!
//! # Pipeline
//!
//! - **Fetch**: list the published plans through a [`TimetableSource`]
//! - **Select**: split entries into today/tomorrow by title marker
//! - **Load**: download and decode each plan image
//! - **Compose**: stack each day vertically, then put the days side by side
//! - **Serve**: encode once as JPEG and answer `GET /timetables` with it
//!
//! # Example
//!
//! ```no_run
//! use dsb_timetables::{DsbClient, ImageLoader, ServiceConfig, TimetableServer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::default();
//! let mut source = DsbClient::new(&config)?;
//! let loader = ImageLoader::new(&config)?;
//! let composite = dsb_timetables::build_composite(&mut source, &loader, &config)?;
//!
//! let server = TimetableServer::bind(&config)?;
//! server.serve(&composite);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod dsb;
pub mod loader;
pub mod pipeline;
pub mod rendering;
pub mod select;
pub mod server;

pub use dsb::{DsbClient, TimetableSource};
pub use loader::{ImageLoader, LoadFailure, LoadOutcome};
pub use pipeline::build_composite;
pub use rendering::Composite;
pub use server::TimetableServer;

/// A published plan: its title and the URL of its image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEntry {
    /// Title as shown in the DSB app, e.g. "Vertretungsplan heute"
    pub title: String,
    /// Absolute URL of the plan image
    pub image_url: String,
}

impl TimetableEntry {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
        }
    }
}

/// Configuration for the timetable service
///
/// The defaults reproduce the service's fixed behavior: the school's shared
/// account, port 8000 and the German "heute"/"morgen" title markers. Every
/// outbound request is bounded by `timeout_ms`.
///
/// # Examples
///
/// ```
/// let cfg = dsb_timetables::ServiceConfig::default();
/// assert_eq!(cfg.port, 8000);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// DSB account identifier
    pub user: String,
    /// DSB account password
    pub password: String,
    /// Base URL of the DSBmobile API
    pub api_base: String,
    /// Host/interface to bind the HTTP server on
    pub bind_host: String,
    /// Port to serve `/timetables` on
    pub port: u16,
    /// Timeout for each outbound request in milliseconds
    pub timeout_ms: u64,
    /// Title substring marking today's plans
    pub today_marker: String,
    /// Title substring marking tomorrow's plans
    pub tomorrow_marker: String,
    /// JPEG quality (1..=100) of the served composite
    pub jpeg_quality: u8,
    /// Number of request-serving threads
    pub workers: usize,
    /// User agent string sent with outbound requests
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            user: "236661".to_string(),
            password: "GOmobile".to_string(),
            api_base: "https://mobileapi.dsbcontrol.de".to_string(),
            bind_host: "0.0.0.0".to_string(),
            port: 8000,
            timeout_ms: 30000,
            today_marker: "heute".to_string(),
            tomorrow_marker: "morgen".to_string(),
            jpeg_quality: 75,
            workers: num_cpus::get(),
            user_agent: concat!("dsb-timetables/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServiceConfig {
    /// Check the configuration before anything touches the network.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::ConfigError("timeout_ms must be non-zero".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::ConfigError(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.workers == 0 {
            return Err(Error::ConfigError("workers must be at least 1".into()));
        }
        if self.today_marker.is_empty() || self.tomorrow_marker.is_empty() {
            return Err(Error::ConfigError("title markers must not be empty".into()));
        }
        url::Url::parse(&self.api_base)
            .map_err(|e| Error::ConfigError(format!("api_base {:?}: {}", self.api_base, e)))?;
        Ok(())
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}
