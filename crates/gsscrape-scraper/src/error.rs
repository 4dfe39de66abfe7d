use gsscrape_core::RecordField;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid header \"{name}\": {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Why a single raw listing item could not become a [`gsscrape_core::Record`].
///
/// Both variants keep the raw payload so the caller can log it; the item is
/// dropped and the page continues.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record {} is missing field `{field}`", display_id(.id.as_deref()))]
    MissingField {
        field: RecordField,
        id: Option<String>,
        payload: Value,
    },

    #[error("record {} has invalid `{field}` value {value}", display_id(.id.as_deref()))]
    InvalidValue {
        field: RecordField,
        id: Option<String>,
        value: Value,
        payload: Value,
    },
}

impl RecordError {
    #[must_use]
    pub fn field(&self) -> RecordField {
        match self {
            RecordError::MissingField { field, .. } | RecordError::InvalidValue { field, .. } => {
                *field
            }
        }
    }

    #[must_use]
    pub fn payload(&self) -> &Value {
        match self {
            RecordError::MissingField { payload, .. }
            | RecordError::InvalidValue { payload, .. } => payload,
        }
    }
}

fn display_id(id: Option<&str>) -> &str {
    id.unwrap_or("<unknown>")
}
