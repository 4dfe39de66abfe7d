//! HTTP client for the paginated product listing endpoint.

mod headers;

use std::collections::BTreeMap;
use std::time::Duration;

use gsscrape_core::{AppConfig, Record};
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};

use crate::collect::{PageRequest, PageSource};
use crate::error::ScraperError;
use crate::response::records_from_payload;

pub use headers::DEFAULT_ACCEPT;

/// Query keys the client sets from [`PageRequest`]. A caller-supplied
/// parameter with the same key replaces the page-controlled value.
pub const RESERVED_PARAMS: [&str; 2] = ["page", "size"];

/// Fixed request settings for one collection run.
#[derive(Debug, Clone)]
pub struct PageClientSettings {
    pub base_url: String,
    pub referer: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Headers merged over the default set; caller values win on collision.
    pub extra_headers: BTreeMap<String, String>,
    /// Query parameters appended after `page` and `size`.
    pub extra_params: BTreeMap<String, String>,
}

impl PageClientSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            referer: config.referer.clone(),
            user_agent: config.user_agent.clone(),
            timeout_secs: config.request_timeout_secs,
            extra_headers: BTreeMap::new(),
            extra_params: BTreeMap::new(),
        }
    }
}

/// HTTP client for the listing API.
///
/// Holds one pooled `reqwest::Client` reused for every page. Non-2xx
/// responses and network failures are returned as errors without retrying.
pub struct PageClient {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
    extra_params: BTreeMap<String, String>,
}

impl PageClient {
    /// Creates a `PageClient` with the configured timeout, merged headers and
    /// extra query parameters.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`ScraperError::InvalidHeader`] if a header name or value is not
    ///   valid HTTP.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(settings: PageClientSettings) -> Result<Self, ScraperError> {
        let base_url =
            Url::parse(&settings.base_url).map_err(|e| ScraperError::InvalidBaseUrl {
                base_url: settings.base_url.clone(),
                reason: e.to_string(),
            })?;

        let headers = headers::build_headers(
            &settings.referer,
            &settings.user_agent,
            &settings.extra_headers,
        )?;

        for key in RESERVED_PARAMS {
            if let Some(value) = settings.extra_params.get(key) {
                tracing::warn!(
                    param = key,
                    value = %value,
                    "caller-supplied query parameter overrides the page-controlled value"
                );
            }
        }

        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url,
            headers,
            extra_params: settings.extra_params,
        })
    }

    /// Headers sent with every request (defaults merged with caller overrides).
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Fetches one page and returns its valid records in response order.
    ///
    /// An empty `Vec` means the page had no records or an unrecognized body
    /// shape.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ScraperError::Http`] for network or timeout failures.
    /// - [`ScraperError::Deserialize`] if the body is not JSON.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Record>, ScraperError> {
        let url = self.page_url(request);
        tracing::debug!(%url, page = request.page, "requesting listing page");

        let response = self
            .client
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("listing page {} from {}", request.page, self.base_url),
                source: e,
            }
        })?;

        Ok(records_from_payload(&payload, request.page))
    }

    /// Builds the request URL for one page: the base URL's own query, then
    /// `page` and `size`, then the extra parameters.
    fn page_url(&self, request: PageRequest) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(query_pairs(request, &self.extra_params));
        url
    }
}

impl PageSource for PageClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Record>, ScraperError> {
        PageClient::fetch_page(self, request).await
    }
}

/// Merges `page`/`size` with the caller's parameters. A caller key equal to a
/// reserved key replaces its value in place; other keys are appended in key
/// order.
fn query_pairs(request: PageRequest, extra: &BTreeMap<String, String>) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("page".to_owned(), request.page.to_string()),
        ("size".to_owned(), request.page_size.to_string()),
    ];
    for (key, value) in extra {
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1.clone_from(value),
            None => pairs.push((key.clone(), value.clone())),
        }
    }
    pairs
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
