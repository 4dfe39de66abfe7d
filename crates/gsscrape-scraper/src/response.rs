//! Record-list extraction from listing API response bodies.
//!
//! ## Observed shapes
//!
//! Flat:
//! ```text
//! {"products": [{"goodsNo": "12345678", ...}]}
//! ```
//!
//! Wrapped:
//! ```text
//! {"data": {"products": [{"goodsNo": "12345678", ...}]}}
//! ```
//!
//! A body matching neither shape is treated as an empty page rather than an
//! error, which in turn ends the collection run.

use gsscrape_core::Record;
use serde_json::Value;

use crate::normalize::{lookup_path, parse_record};

/// Candidate locations of the record list, tried in order.
const RECORD_LIST_PATHS: &[&[&str]] = &[&["products"], &["data", "products"]];

/// Returns the first candidate location that holds a JSON array.
#[must_use]
pub fn extract_record_list(payload: &Value) -> Option<&Vec<Value>> {
    RECORD_LIST_PATHS
        .iter()
        .find_map(|path| lookup_path(payload, path)?.as_array())
}

/// Extracts and normalizes every record on one page.
///
/// Items that fail normalization are logged at `debug` and skipped; one bad
/// item never drops the rest of the page.
#[must_use]
pub fn records_from_payload(payload: &Value, page: u32) -> Vec<Record> {
    let Some(items) = extract_record_list(payload) else {
        tracing::warn!(
            page,
            "response matched no known record-list shape; treating page as empty"
        );
        return Vec::new();
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match parse_record(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!(
                    page,
                    error = %e,
                    payload = %e.payload(),
                    "skipping record due to schema issue"
                );
            }
        }
    }

    if records.len() < items.len() {
        tracing::debug!(
            page,
            parsed = records.len(),
            skipped = items.len() - records.len(),
            "dropped malformed records"
        );
    }

    records
}
