//! Normalization of one raw listing item into a [`Record`].
//!
//! The listing API has drifted between field names over time (`goodsNo` vs
//! `goodsId`, nested `price.sellPrice` vs flat `sellPrice`, ...). Each logical
//! field therefore resolves through an ordered list of candidate paths; the
//! first candidate that is present wins.

use gsscrape_core::{Record, RecordField};
use serde_json::Value;

use crate::error::RecordError;

/// A path of object keys, e.g. `["price", "sellPrice"]`.
type FieldPath = &'static [&'static str];

struct FieldRule {
    field: RecordField,
    candidates: &'static [FieldPath],
}

const ID_RULE: FieldRule = FieldRule {
    field: RecordField::Id,
    candidates: &[&["goodsNo"], &["goodsId"]],
};

const NAME_RULE: FieldRule = FieldRule {
    field: RecordField::Name,
    candidates: &[&["goodsNm"], &["name"]],
};

const PRICE_RULE: FieldRule = FieldRule {
    field: RecordField::Price,
    candidates: &[&["price", "sellPrice"], &["sellPrice"]],
};

const URL_RULE: FieldRule = FieldRule {
    field: RecordField::Url,
    candidates: &[&["detailUrl"], &["url"], &["goodsDetailUrl"]],
};

/// Follows `path` through nested objects. Any non-object along the way
/// yields `None`.
pub(crate) fn lookup_path<'a>(payload: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(payload, |current, key| current.get(*key))
}

/// `null` and blank strings count as absent so the next candidate is tried.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

impl FieldRule {
    fn resolve<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|path| lookup_path(payload, path))
            .find(|value| is_present(value))
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `i64::MIN` and `i64::MAX + 1` as exact `f64` values (both are powers of two).
const I64_FLOAT_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_FLOAT_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn as_price(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(price) => Some(price),
            None if n.is_u64() => None,
            None => n.as_f64().and_then(float_to_price),
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Truncates toward zero; values whose integer part does not fit in `i64`
/// are rejected rather than clamped.
#[allow(clippy::cast_possible_truncation)]
fn float_to_price(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    if truncated >= I64_FLOAT_LOWER && truncated < I64_FLOAT_UPPER {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Normalizes one raw listing item into a [`Record`].
///
/// # Errors
///
/// - [`RecordError::MissingField`] when no candidate for a field is present.
/// - [`RecordError::InvalidValue`] when the winning candidate has the wrong
///   type, or the price does not coerce to an integer.
pub fn parse_record(payload: &Value) -> Result<Record, RecordError> {
    let id = resolve_text(&ID_RULE, payload, None)?;
    let name = resolve_text(&NAME_RULE, payload, Some(&id))?;

    let raw_price = resolve(&PRICE_RULE, payload, Some(&id))?;
    let price = as_price(raw_price).ok_or_else(|| RecordError::InvalidValue {
        field: RecordField::Price,
        id: Some(id.clone()),
        value: raw_price.clone(),
        payload: payload.clone(),
    })?;

    let url = resolve_text(&URL_RULE, payload, Some(&id))?;

    Ok(Record {
        id,
        name,
        price,
        url,
    })
}

fn resolve<'a>(
    rule: &FieldRule,
    payload: &'a Value,
    id: Option<&str>,
) -> Result<&'a Value, RecordError> {
    rule.resolve(payload)
        .ok_or_else(|| RecordError::MissingField {
            field: rule.field,
            id: id.map(str::to_owned),
            payload: payload.clone(),
        })
}

fn resolve_text(
    rule: &FieldRule,
    payload: &Value,
    id: Option<&str>,
) -> Result<String, RecordError> {
    let raw = resolve(rule, payload, id)?;
    as_text(raw).ok_or_else(|| RecordError::InvalidValue {
        field: rule.field,
        id: id.map(str::to_owned),
        value: raw.clone(),
        payload: payload.clone(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
