//! Parsing of repeatable `KEY=VALUE` overrides (`--param`, `--header`).

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyValueError {
    #[error("invalid key/value pair \"{0}\": expected KEY=VALUE")]
    MalformedPair(String),
}

/// Converts `KEY=VALUE` strings into a map.
///
/// The first `=` splits key from value, so `"b=2=x"` yields `b -> "2=x"`.
/// When a key repeats, the last occurrence wins.
///
/// # Errors
///
/// Returns [`KeyValueError::MalformedPair`] for the first input that
/// contains no `=` at all.
pub fn parse_key_value_pairs<I, S>(pairs: I) -> Result<BTreeMap<String, String>, KeyValueError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = BTreeMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| KeyValueError::MalformedPair(pair.to_owned()))?;
        result.insert(key.to_owned(), value.to_owned());
    }
    Ok(result)
}
