//! Connectivity check against the upstream origin.

use std::sync::LazyLock;

use regex::Regex;

use super::{ListingClient, ACCEPT_HTML};
use crate::error::ScraperError;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub url: String,
    pub status: u16,
    pub title: Option<String>,
}

impl ListingClient {
    /// GETs the base URL and reports status and page title. Non-2xx statuses
    /// are reported, not treated as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on connection failure or timeout.
    pub async fn probe(&self) -> Result<ProbeReport, ScraperError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ProbeReport {
            url,
            status,
            title: page_title(&body),
        })
    }
}

fn page_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}
