//! DSBmobile content fetcher.
//!
//! Logs in with the configured account, lists the published timetables and
//! flattens them into [`TimetableEntry`] values, one per plan page.

use crate::{Error, Result, ServiceConfig, TimetableEntry};
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

const BUNDLE_ID: &str = "de.heinekingmedia.dsbmobile";
const APP_VERSION: &str = "35";
const OS_VERSION: &str = "22";
const NIL_TOKEN: &str = "00000000-0000-0000-0000-000000000000";

/// Anything that can list the currently published timetables.
pub trait TimetableSource {
    /// Fetch all published timetable entries, in publication order
    fn fetch_timetables(&mut self) -> Result<Vec<TimetableEntry>>;
}

/// Fixed lists are sources too; handy for tests and offline runs.
impl TimetableSource for Vec<TimetableEntry> {
    fn fetch_timetables(&mut self) -> Result<Vec<TimetableEntry>> {
        Ok(self.clone())
    }
}

/// One item of the `dsbtimetables` listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
    #[serde(default)]
    childs: Vec<Item>,
}

/// Client for the DSBmobile mobile API
pub struct DsbClient {
    client: Client,
    base: Url,
    user: String,
    password: String,
    timeout_ms: u64,
}

impl DsbClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut base = Url::parse(&config.api_base)
            .map_err(|e| Error::ConfigError(format!("api_base {:?}: {}", config.api_base, e)))?;
        // endpoints are joined relative to the base, so it must name a directory
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::FetchError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            user: config.user.clone(),
            password: config.password.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::FetchError(format!("Invalid endpoint {}: {}", path, e)))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T> {
        let res = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .map_err(|e| self.map_transport(e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::FetchError(format!("{} returned {}", url.path(), status)));
        }

        let body = res.bytes().map_err(|e| self.map_transport(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::FetchError(format!("Malformed response from {}: {}", url.path(), e)))
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout_ms)
        } else {
            Error::FetchError(format!("HTTP request failed: {}", err))
        }
    }

    /// Exchange the account credentials for a session token
    pub fn authenticate(&self) -> Result<String> {
        let url = self.endpoint("authid")?;
        let token: String = self.get_json(
            url,
            &[
                ("bundleid", BUNDLE_ID),
                ("appversion", APP_VERSION),
                ("osversion", OS_VERSION),
                ("pushid", ""),
                ("user", self.user.as_str()),
                ("password", self.password.as_str()),
            ],
        )?;

        if token.is_empty() || token == NIL_TOKEN {
            return Err(Error::FetchError(format!("Authentication failed for account {}", self.user)));
        }
        Ok(token)
    }

    fn flatten(&self, items: Vec<Item>) -> Vec<TimetableEntry> {
        let mut entries = Vec::new();
        for item in items {
            let pages: Vec<&str> = item
                .childs
                .iter()
                .map(|c| c.detail.trim())
                .filter(|d| !d.is_empty())
                .collect();

            if pages.is_empty() && !item.detail.trim().is_empty() {
                self.push_entry(&mut entries, &item.title, item.detail.trim());
                continue;
            }
            for page in pages {
                self.push_entry(&mut entries, &item.title, page);
            }
        }
        entries
    }

    fn push_entry(&self, entries: &mut Vec<TimetableEntry>, title: &str, detail: &str) {
        match self.base.join(detail) {
            Ok(url) => entries.push(TimetableEntry::new(title, url.to_string())),
            Err(e) => log::warn!("Skipping {:?}: bad image URL {:?}: {}", title, detail, e),
        }
    }
}

impl TimetableSource for DsbClient {
    fn fetch_timetables(&mut self) -> Result<Vec<TimetableEntry>> {
        let token = self.authenticate()?;
        let url = self.endpoint("dsbtimetables")?;
        let items: Vec<Item> = self.get_json(url, &[("authid", token.as_str())])?;
        let entries = self.flatten(items);
        log::info!("Fetched {} timetable entries", entries.len());
        Ok(entries)
    }
}
