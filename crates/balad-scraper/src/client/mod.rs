//! HTTP client for server-rendered listing pages
//! (`{base}/city-{slug}/cat-{category}?page=N`).

mod probe;

use std::future::Future;
use std::time::Duration;

use balad_core::AppConfig;
use reqwest::Client;

use crate::error::ScraperError;
use crate::page::{parse_listing_page, PageResult};

pub use probe::ProbeReport;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Anything that can produce the [`PageResult`] for a page ordinal.
///
/// The aggregation driver only talks to this trait, so runs can be replayed
/// from canned pages.
pub trait PageSource {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<PageResult, ScraperError>>;
}

/// Fetches listing pages for one city and category.
///
/// 404 and other non-2xx responses surface as typed errors distinct from
/// network failures. There is no retry.
pub struct ListingClient {
    client: Client,
    base_url: String,
    city_slug: String,
    category: String,
    accept_language: String,
}

impl ListingClient {
    /// Creates a `ListingClient` with the given timeout and request headers.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        city_slug: &str,
        category: &str,
        timeout_secs: u64,
        user_agent: &str,
        accept_language: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            city_slug: city_slug.to_owned(),
            category: category.to_owned(),
            accept_language: accept_language.to_owned(),
        })
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, city_slug: &str) -> Result<Self, ScraperError> {
        Self::new(
            &config.base_url,
            city_slug,
            &config.category,
            config.request_timeout_secs,
            &config.user_agent,
            &config.accept_language,
        )
    }

    /// Builds the URL of listing page `page`. Page 1 has no query string.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the base URL does not parse.
    pub fn page_url(&self, page: u32) -> Result<String, ScraperError> {
        let raw = format!(
            "{}/city-{}/cat-{}",
            self.base_url, self.city_slug, self.category
        );
        let mut url = reqwest::Url::parse(&raw).map_err(|e| ScraperError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if page > 1 {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        Ok(url.to_string())
    }

    /// GETs `url` and returns the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] on HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::Http`] on connection failure or timeout.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
            .header(reqwest::header::REFERER, format!("{}/", self.base_url))
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageSource for ListingClient {
    async fn fetch_page(&self, page: u32) -> Result<PageResult, ScraperError> {
        let url = self.page_url(page)?;
        tracing::info!(page, %url, "fetching listing page");
        let html = self.fetch_html(&url).await?;
        parse_listing_page(&html, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ListingClient {
        ListingClient::new(base, "tehran", "supermarket", 5, "balad-test/0.1", "fa-IR").unwrap()
    }

    #[test]
    fn first_page_has_no_query() {
        assert_eq!(
            client("https://balad.ir").page_url(1).unwrap(),
            "https://balad.ir/city-tehran/cat-supermarket"
        );
    }

    #[test]
    fn later_pages_carry_page_param() {
        assert_eq!(
            client("https://balad.ir/").page_url(3).unwrap(),
            "https://balad.ir/city-tehran/cat-supermarket?page=3"
        );
    }

    #[test]
    fn non_ascii_slug_is_percent_encoded() {
        let c = ListingClient::new("https://balad.ir", "قم", "supermarket", 5, "ua", "fa").unwrap();
        let url = c.page_url(1).unwrap();
        assert!(url.starts_with("https://balad.ir/city-%D9%82%D9%85/"), "got {url}");
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = client("not a url").page_url(1).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidUrl { .. }), "got {err:?}");
    }
}
