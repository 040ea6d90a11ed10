//! Field parsing and error-envelope inspection shared by the providers.

use std::str::FromStr;

use chrono::NaiveDate;
use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::errors::QuoteError;

const ERROR_MESSAGE: &str = "Error Message";
const NOTE: &str = "Note";
const INFORMATION: &str = "Information";

/// Provider placeholders for "no value".
pub(crate) fn is_sentinel(raw: &str) -> bool {
    matches!(raw.trim(), "" | "None" | "-" | "N/A")
}

/// Strip percent signs, thousands separators and padding.
fn clean_numeric(raw: &str) -> String {
    raw.trim().trim_end_matches('%').trim().replace(',', "")
}

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    let cleaned = clean_numeric(raw);
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Parse a required decimal field.
pub(crate) fn parse_decimal(provider: &str, field: &str, raw: &str) -> Result<Decimal, QuoteError> {
    decimal_from_str(raw).ok_or_else(|| {
        QuoteError::parse(provider, format!("field '{}' is not a number: {:?}", field, raw))
    })
}

/// Parse a required non-negative integer field such as volume.
pub(crate) fn parse_volume(provider: &str, field: &str, raw: &str) -> Result<u64, QuoteError> {
    let cleaned = clean_numeric(raw);
    cleaned
        .parse::<u64>()
        .ok()
        .or_else(|| {
            decimal_from_str(&cleaned)
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_u64())
        })
        .ok_or_else(|| {
            QuoteError::parse(
                provider,
                format!("field '{}' is not a non-negative integer: {:?}", field, raw),
            )
        })
}

/// Parse a `YYYY-MM-DD` date field.
pub(crate) fn parse_date(provider: &str, field: &str, raw: &str) -> Result<NaiveDate, QuoteError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        QuoteError::parse(provider, format!("field '{}' is not a date ({:?}): {}", field, raw, e))
    })
}

/// Text value of a field, with sentinels treated as absent.
pub(crate) fn optional_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !is_sentinel(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decimal value of a field; sentinels and unparseable values are absent.
pub(crate) fn optional_decimal(map: &Map<String, Value>, key: &str) -> Option<Decimal> {
    match map.get(key)? {
        Value::String(s) if !is_sentinel(s) => decimal_from_str(s),
        Value::Number(n) => decimal_from_str(&n.to_string()),
        _ => None,
    }
}

/// Integer value of a field; sentinels and unparseable values are absent.
pub(crate) fn optional_u64(map: &Map<String, Value>, key: &str) -> Option<u64> {
    match map.get(key)? {
        Value::String(s) if !is_sentinel(s) => parse_volume("", key, s).ok(),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).and_then(|f| f.to_u64())),
        _ => None,
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("api call frequency")
        || lower.contains("rate limit")
        || lower.contains("limit reach")
}

/// Check a JSON object for an explicit provider error envelope.
///
/// - `"Error Message"` containing "Invalid API call" means the provider
///   rejected the symbol; a rate-limit text means the quota is exhausted;
///   anything else is a generic provider error.
/// - `"Note"` / `"Information"` mentioning call frequency or a rate limit
///   means the quota is exhausted. Other notes are logged and ignored.
pub(crate) fn check_envelope(
    provider: &str,
    symbol: &str,
    map: &Map<String, Value>,
) -> Result<(), QuoteError> {
    if let Some(message) = map.get(ERROR_MESSAGE).and_then(Value::as_str) {
        if message.contains("Invalid API call") {
            return Err(QuoteError::InvalidSymbol {
                provider: provider.to_string(),
                symbol: symbol.to_string(),
            });
        }
        if mentions_rate_limit(message) {
            return Err(QuoteError::rate_limited(provider));
        }
        return Err(QuoteError::provider(provider, message));
    }

    for key in [NOTE, INFORMATION] {
        if let Some(message) = map.get(key).and_then(Value::as_str) {
            if mentions_rate_limit(message) {
                return Err(QuoteError::rate_limited(provider));
            }
            warn!("{} {}: {}", provider, key.to_lowercase(), message);
        }
    }

    Ok(())
}

/// The informational note of an envelope, if any.
///
/// Used to explain a response that passed [`check_envelope`] but carries
/// no payload.
pub(crate) fn envelope_note(map: &Map<String, Value>) -> Option<&str> {
    [NOTE, INFORMATION]
        .into_iter()
        .find_map(|key| map.get(key).and_then(Value::as_str))
}
