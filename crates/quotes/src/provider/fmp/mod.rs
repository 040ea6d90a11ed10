//! Financial Modeling Prep quote provider implementation.
//!
//! A single endpoint, `/quote/{symbol}`, which answers with a JSON list
//! holding one quote object. No history or fundamentals are fetched from
//! this provider.
//!
//! API documentation: https://site.financialmodelingprep.com/developer/docs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use log::debug;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::QuoteError;
use crate::models::{Quote, QuoteOrigin, Symbol};
use crate::provider::http::{self, DEFAULT_TIMEOUT};
use crate::provider::parse::check_envelope;
use crate::provider::{ProviderCapabilities, QuoteProvider, RateLimit};

pub const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const PROVIDER_ID: &str = "FMP";

// ============================================================================
// API Response Structures
// ============================================================================

/// Element of the /quote response list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: Option<String>,
    name: Option<String>,
    price: Option<Decimal>,
    /// Whole percent; the v3 API spells it "changesPercentage"
    #[serde(alias = "changesPercentage")]
    change_percentage: Option<Decimal>,
    change: Option<Decimal>,
    day_low: Option<Decimal>,
    day_high: Option<Decimal>,
    open: Option<Decimal>,
    previous_close: Option<Decimal>,
    volume: Option<Decimal>,
    /// Unix seconds of the last trade
    timestamp: Option<i64>,
}

fn trading_day(timestamp: Option<i64>) -> Option<NaiveDate> {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.date_naive())
}

// ============================================================================
// FmpProvider
// ============================================================================

/// Financial Modeling Prep quote provider.
///
/// Quotes only. Free tier is limited to 250 API calls per day.
pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_options(api_key, BASE_URL.to_string(), DEFAULT_TIMEOUT)
    }

    /// Create a provider against a specific endpoint.
    pub fn with_options(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: http::build_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn quote_url(&self, symbol: &Symbol) -> Result<Url, QuoteError> {
        let mut url = Url::parse(&format!("{}/quote/{}", self.base_url, symbol)).map_err(|e| {
            QuoteError::provider(PROVIDER_ID, format!("Failed to build URL: {}", e))
        })?;
        url.query_pairs_mut().append_pair(http::API_KEY_PARAM, &self.api_key);
        Ok(url)
    }

    /// Normalize a /quote response body: the first list element wins.
    fn parse_quote(symbol: &Symbol, text: &str) -> Result<Quote, QuoteError> {
        let items = match http::parse_json(PROVIDER_ID, text)? {
            Value::Array(items) => items,
            Value::Object(map) => {
                check_envelope(PROVIDER_ID, symbol.as_str(), &map)?;
                return Err(QuoteError::provider(
                    PROVIDER_ID,
                    "Unexpected response: expected a list of quotes",
                ));
            }
            _ => {
                return Err(QuoteError::parse(
                    PROVIDER_ID,
                    "Unexpected response: expected a list of quotes",
                ))
            }
        };

        let first = items
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::NotFound(symbol.to_string()))?;

        let raw: FmpQuote = serde_json::from_value(first)
            .map_err(|e| QuoteError::parse(PROVIDER_ID, format!("Unexpected quote shape: {}", e)))?;

        let price = raw
            .price
            .ok_or_else(|| QuoteError::parse(PROVIDER_ID, "missing field 'price'"))?;

        let change = raw
            .change
            .or_else(|| raw.previous_close.map(|pc| price - pc))
            .ok_or_else(|| QuoteError::parse(PROVIDER_ID, "missing field 'change'"))?;

        let change_percent = match (raw.change_percentage, raw.previous_close) {
            (Some(pct), _) => pct,
            (None, Some(pc)) if !pc.is_zero() => (change / pc * Decimal::ONE_HUNDRED).round_dp(4),
            _ => {
                return Err(QuoteError::parse(
                    PROVIDER_ID,
                    "missing field 'changePercentage'",
                ))
            }
        };

        let volume = match raw.volume {
            Some(v) if v.is_sign_negative() => {
                return Err(QuoteError::parse(PROVIDER_ID, "field 'volume' is negative"))
            }
            Some(v) => Some(
                num_traits::ToPrimitive::to_u64(&v.trunc())
                    .ok_or_else(|| QuoteError::parse(PROVIDER_ID, "field 'volume' out of range"))?,
            ),
            None => None,
        };

        let canonical = raw
            .symbol
            .as_deref()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| symbol.to_string());

        let mut quote = Quote::new(
            canonical,
            price,
            change,
            change_percent,
            PROVIDER_ID,
            QuoteOrigin::Live,
        );
        quote.name = raw.name.filter(|n| !n.trim().is_empty());
        quote.open = raw.open;
        quote.high = raw.day_high;
        quote.low = raw.day_low;
        quote.previous_close = raw.previous_close;
        quote.volume = volume;
        quote.latest_trading_day = trading_day(raw.timestamp);

        Ok(quote)
    }
}

// ============================================================================
// QuoteProvider trait implementation
// ============================================================================

#[async_trait]
impl QuoteProvider for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_history: false,
            supports_overview: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: None,
            requests_per_day: Some(250),
        }
    }

    async fn latest_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        let url = self.quote_url(symbol)?;
        let text = http::get_text(&self.client, PROVIDER_ID, url).await?;
        let quote = Self::parse_quote(symbol, &text)?;

        debug!("FMP: fetched quote for {} at {}", symbol, quote.price);
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, ProviderErrorKind};
    use rust_decimal_macros::dec;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    const AAPL_QUOTE: &str = r#"[
        {
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 188.5,
            "changesPercentage": 1.4805,
            "change": 2.75,
            "dayLow": 185.2,
            "dayHigh": 189.1,
            "yearHigh": 199.62,
            "yearLow": 164.08,
            "marketCap": 2915000000000,
            "volume": 52164500,
            "open": 186.1,
            "previousClose": 185.75,
            "timestamp": 1709931600
        }
    ]"#;

    #[test]
    fn test_provider_id_and_capabilities() {
        let provider = FmpProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "FMP");
        let caps = provider.capabilities();
        assert!(!caps.supports_history);
        assert!(!caps.supports_overview);
    }

    #[test]
    fn test_quote_url_carries_symbol_and_key() {
        let provider = FmpProvider::with_options(
            "secret".to_string(),
            "http://localhost:9000/api/v3/".to_string(),
            DEFAULT_TIMEOUT,
        );
        let url = provider.quote_url(&sym("brk.b")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/api/v3/quote/BRK.B?apikey=secret"
        );
    }

    #[test]
    fn test_quote_parsing_takes_first_element() {
        let quote = FmpProvider::parse_quote(&sym("aapl"), AAPL_QUOTE).unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name.as_deref(), Some("Apple Inc."));
        assert_eq!(quote.price, dec!(188.5));
        assert_eq!(quote.change, dec!(2.75));
        assert_eq!(quote.change_percent, dec!(1.4805));
        assert_eq!(quote.previous_close, Some(dec!(185.75)));
        assert_eq!(quote.high, Some(dec!(189.1)));
        assert_eq!(quote.low, Some(dec!(185.2)));
        assert_eq!(quote.volume, Some(52_164_500));
        assert_eq!(quote.latest_trading_day.unwrap().to_string(), "2024-03-08");
        assert_eq!(quote.source, "FMP");
    }

    #[test]
    fn test_quote_stable_api_field_name() {
        let body = r#"[{"symbol": "MSFT", "price": 400.0, "changePercentage": -0.5, "change": -2.01}]"#;
        let quote = FmpProvider::parse_quote(&sym("MSFT"), body).unwrap();
        assert_eq!(quote.change_percent, dec!(-0.5));
        assert!(quote.volume.is_none());
    }

    #[test]
    fn test_quote_derives_change_from_previous_close() {
        let body = r#"[{"symbol": "MSFT", "price": 102, "previousClose": 100}]"#;
        let quote = FmpProvider::parse_quote(&sym("MSFT"), body).unwrap();
        assert_eq!(quote.change, dec!(2));
        assert_eq!(quote.change_percent, dec!(2));
    }

    #[test]
    fn test_empty_list_is_not_found() {
        let err = FmpProvider::parse_quote(&sym("ZZZZ"), "[]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_price_is_parse_error() {
        let err = FmpProvider::parse_quote(&sym("AAPL"), r#"[{"symbol": "AAPL"}]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"Error Message": "Invalid API KEY. Feel free to create a Free API Key."}"#;
        let err = FmpProvider::parse_quote(&sym("AAPL"), body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider(ProviderErrorKind::Other));

        let body = r#"{"Error Message": "Limit Reach . Please upgrade your plan or visit our documentation for more details."}"#;
        let err = FmpProvider::parse_quote(&sym("AAPL"), body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider(ProviderErrorKind::RateLimited));
    }
}
