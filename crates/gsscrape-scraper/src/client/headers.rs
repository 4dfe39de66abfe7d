//! Default request headers and caller overrides.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, REFERER, USER_AGENT};

use crate::error::ScraperError;

pub const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";

/// Builds the browser-like baseline (`User-Agent`, `Referer`, `Accept`) and
/// inserts `extra` over it. Header names compare case-insensitively, so an
/// extra `referer` replaces the default `Referer`.
pub(super) fn build_headers(
    referer: &str,
    user_agent: &str,
    extra: &BTreeMap<String, String>,
) -> Result<HeaderMap, ScraperError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(USER_AGENT.as_str(), user_agent)?);
    headers.insert(REFERER, header_value(REFERER.as_str(), referer)?);
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

    for (name, value) in extra {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScraperError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        headers.insert(header_name, header_value(name, value)?);
    }

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
        name: name.to_owned(),
        reason: e.to_string(),
    })
}
