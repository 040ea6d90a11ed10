//! Alpha Vantage quote provider implementation.
//!
//! This module provides market data from the Alpha Vantage API:
//! - Latest quotes via GLOBAL_QUOTE endpoint
//! - Historical series via TIME_SERIES_DAILY / _WEEKLY / _MONTHLY endpoints
//! - Company fundamentals via OVERVIEW endpoint
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::QuoteError;
use crate::models::{
    Bar, CompanyOverview, Granularity, HistoricalSeries, Quote, QuoteOrigin, Symbol,
};
use crate::provider::http::{self, DEFAULT_TIMEOUT};
use crate::provider::parse::{
    check_envelope, envelope_note, is_sentinel, optional_decimal, optional_text, optional_u64,
    parse_date, parse_decimal, parse_volume,
};
use crate::provider::{ProviderCapabilities, QuoteProvider, RateLimit};

pub const BASE_URL: &str = "https://www.alphavantage.co/query";
pub const PROVIDER_ID: &str = "ALPHA_VANTAGE";

const GLOBAL_QUOTE: &str = "Global Quote";
const PRICE_FIELD: &str = "05. price";

/// How much history TIME_SERIES_DAILY returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputSize {
    /// Latest 100 bars.
    Compact,
    /// Full history (20+ years). Premium-only on some keys.
    #[default]
    Full,
}

impl OutputSize {
    fn as_param(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

impl FromStr for OutputSize {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            other => Err(QuoteError::Validation(format!(
                "Unknown output size '{}'; expected compact or full",
                other
            ))),
        }
    }
}

/// Alpha Vantage quote provider.
///
/// Supports quotes, daily/weekly/monthly history and company overviews.
/// Free tier is limited to 5 API calls per minute.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
    output_size: OutputSize,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// Body of the "Global Quote" object
#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "02. open")]
    open: Option<String>,
    #[serde(rename = "03. high")]
    high: Option<String>,
    #[serde(rename = "04. low")]
    low: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

/// One row of a TIME_SERIES_* payload
#[derive(Debug, Deserialize)]
struct SeriesRow {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Endpoint function and payload key for each granularity.
fn series_endpoint(granularity: Granularity) -> (&'static str, &'static str) {
    match granularity {
        Granularity::Daily => ("TIME_SERIES_DAILY", "Time Series (Daily)"),
        Granularity::Weekly => ("TIME_SERIES_WEEKLY", "Weekly Time Series"),
        Granularity::Monthly => ("TIME_SERIES_MONTHLY", "Monthly Time Series"),
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, QuoteError> {
    value
        .as_object()
        .ok_or_else(|| QuoteError::provider(PROVIDER_ID, "expected a JSON object"))
}

/// The expected payload is missing: explain with the provider's note if
/// there is one, otherwise report that the symbol has no data.
fn missing_payload(map: &Map<String, Value>, symbol: &Symbol) -> QuoteError {
    match envelope_note(map) {
        Some(note) => QuoteError::provider(PROVIDER_ID, note),
        None => QuoteError::NotFound(symbol.to_string()),
    }
}

fn required<'a>(field: &str, raw: &'a Option<String>) -> Result<&'a str, QuoteError> {
    raw.as_deref()
        .filter(|r| !is_sentinel(r))
        .ok_or_else(|| QuoteError::parse(PROVIDER_ID, format!("missing field '{}'", field)))
}

fn optional(field: &str, raw: &Option<String>) -> Result<Option<Decimal>, QuoteError> {
    raw.as_deref()
        .filter(|r| !is_sentinel(r))
        .map(|r| parse_decimal(PROVIDER_ID, field, r))
        .transpose()
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_options(api_key, BASE_URL.to_string(), DEFAULT_TIMEOUT, OutputSize::default())
    }

    /// Create a provider against a specific endpoint.
    pub fn with_options(
        api_key: String,
        base_url: String,
        timeout: Duration,
        output_size: OutputSize,
    ) -> Self {
        Self {
            client: http::build_client(timeout),
            api_key,
            base_url,
            output_size,
        }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, QuoteError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push((http::API_KEY_PARAM, &self.api_key));

        let url = Url::parse_with_params(&self.base_url, &all_params).map_err(|e| {
            QuoteError::provider(PROVIDER_ID, format!("Failed to build URL: {}", e))
        })?;

        http::get_text(&self.client, PROVIDER_ID, url).await
    }

    /// Normalize a GLOBAL_QUOTE response body.
    fn parse_global_quote(symbol: &Symbol, text: &str) -> Result<Quote, QuoteError> {
        let value = http::parse_json(PROVIDER_ID, text)?;
        let map = as_object(&value)?;
        check_envelope(PROVIDER_ID, symbol.as_str(), map)?;

        let quote_map = match map.get(GLOBAL_QUOTE) {
            Some(Value::Object(q)) => q,
            Some(_) => {
                return Err(QuoteError::parse(
                    PROVIDER_ID,
                    "'Global Quote' is not an object",
                ))
            }
            None => return Err(missing_payload(map, symbol)),
        };

        // Unknown symbols come back as an empty (or nearly empty) quote object
        if !quote_map.contains_key(PRICE_FIELD) {
            if quote_map.len() <= 1 {
                return Err(QuoteError::NotFound(symbol.to_string()));
            }
            return Err(QuoteError::parse(
                PROVIDER_ID,
                format!("missing field '{}'", PRICE_FIELD),
            ));
        }

        let raw: GlobalQuote = serde_json::from_value(Value::Object(quote_map.clone()))
            .map_err(|e| QuoteError::parse(PROVIDER_ID, format!("Unexpected quote shape: {}", e)))?;

        let price = parse_decimal(PROVIDER_ID, PRICE_FIELD, required(PRICE_FIELD, &raw.price)?)?;
        let change = parse_decimal(PROVIDER_ID, "09. change", required("09. change", &raw.change)?)?;
        // Wire format is "1.2345%": already whole percent
        let change_percent = parse_decimal(
            PROVIDER_ID,
            "10. change percent",
            required("10. change percent", &raw.change_percent)?,
        )?;

        let volume = raw
            .volume
            .as_deref()
            .filter(|r| !is_sentinel(r))
            .map(|r| parse_volume(PROVIDER_ID, "06. volume", r))
            .transpose()?;
        let latest_trading_day = raw
            .latest_trading_day
            .as_deref()
            .filter(|r| !is_sentinel(r))
            .map(|r| parse_date(PROVIDER_ID, "07. latest trading day", r))
            .transpose()?;

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
        quote.open = optional("02. open", &raw.open)?;
        quote.high = optional("03. high", &raw.high)?;
        quote.low = optional("04. low", &raw.low)?;
        quote.previous_close = optional("08. previous close", &raw.previous_close)?;
        quote.volume = volume;
        quote.latest_trading_day = latest_trading_day;

        Ok(quote)
    }

    /// Normalize a TIME_SERIES_* response body into canonical bars.
    fn parse_series(
        symbol: &Symbol,
        granularity: Granularity,
        text: &str,
    ) -> Result<HistoricalSeries, QuoteError> {
        let value = http::parse_json(PROVIDER_ID, text)?;
        let map = as_object(&value)?;
        check_envelope(PROVIDER_ID, symbol.as_str(), map)?;

        let (_, series_key) = series_endpoint(granularity);
        let series = map
            .get(series_key)
            .ok_or_else(|| missing_payload(map, symbol))?;

        let rows: HashMap<String, SeriesRow> = serde_json::from_value(series.clone())
            .map_err(|e| QuoteError::parse(PROVIDER_ID, format!("Unexpected series shape: {}", e)))?;

        let bars = rows
            .into_iter()
            .map(|(date, row)| -> Result<Bar, QuoteError> {
                let field = |name: &str| format!("{} {}", date, name);
                Ok(Bar {
                    date: parse_date(PROVIDER_ID, &date, &date)?,
                    open: parse_decimal(PROVIDER_ID, &field("1. open"), &row.open)?,
                    high: parse_decimal(PROVIDER_ID, &field("2. high"), &row.high)?,
                    low: parse_decimal(PROVIDER_ID, &field("3. low"), &row.low)?,
                    close: parse_decimal(PROVIDER_ID, &field("4. close"), &row.close)?,
                    volume: parse_volume(PROVIDER_ID, &field("5. volume"), &row.volume)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HistoricalSeries::new(symbol.as_str(), granularity, bars))
    }

    /// Normalize an OVERVIEW response body.
    fn parse_overview(symbol: &Symbol, text: &str) -> Result<CompanyOverview, QuoteError> {
        // Unknown symbols come back as `{}`
        let value = match http::parse_json(PROVIDER_ID, text) {
            Err(QuoteError::EmptyResponse { .. }) => {
                return Err(QuoteError::NotFound(symbol.to_string()))
            }
            other => other?,
        };
        let map = as_object(&value)?;

        // Rate limits must stay distinguishable from a genuine miss
        check_envelope(PROVIDER_ID, symbol.as_str(), map)?;

        if map.len() <= 1 {
            return Err(QuoteError::NotFound(symbol.to_string()));
        }

        let returned = optional_text(map, "Symbol");
        if returned.as_deref() != Some(symbol.as_str()) {
            debug!(
                "Alpha Vantage overview for {} returned symbol {:?}",
                symbol, returned
            );
            return Err(QuoteError::NotFound(symbol.to_string()));
        }

        Ok(CompanyOverview {
            source: Some(PROVIDER_ID.to_string()),
            symbol: returned,
            name: optional_text(map, "Name"),
            asset_type: optional_text(map, "AssetType"),
            description: optional_text(map, "Description"),
            exchange: optional_text(map, "Exchange"),
            currency: optional_text(map, "Currency"),
            country: optional_text(map, "Country"),
            sector: optional_text(map, "Sector"),
            industry: optional_text(map, "Industry"),
            market_cap: optional_decimal(map, "MarketCapitalization"),
            pe_ratio: optional_decimal(map, "PERatio"),
            eps: optional_decimal(map, "EPS"),
            dividend_yield: optional_decimal(map, "DividendYield"),
            week_52_high: optional_decimal(map, "52WeekHigh"),
            week_52_low: optional_decimal(map, "52WeekLow"),
            employees: optional_u64(map, "FullTimeEmployees"),
        })
    }
}

// ============================================================================
// QuoteProvider trait implementation
// ============================================================================

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_history: true,
            supports_overview: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: Some(5), // Free tier is very limited
            requests_per_day: Some(25),
        }
    }

    async fn latest_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        let text = self
            .fetch(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol.as_str())])
            .await?;
        let quote = Self::parse_global_quote(symbol, &text)?;

        debug!("Alpha Vantage: fetched quote for {} at {}", symbol, quote.price);
        Ok(quote)
    }

    async fn history(
        &self,
        symbol: &Symbol,
        granularity: Granularity,
    ) -> Result<HistoricalSeries, QuoteError> {
        let (function, _) = series_endpoint(granularity);
        let mut params = vec![("function", function), ("symbol", symbol.as_str())];
        if granularity == Granularity::Daily {
            params.push(("outputsize", self.output_size.as_param()));
        }

        let text = self.fetch(&params).await?;
        let series = Self::parse_series(symbol, granularity, &text)?;

        debug!(
            "Alpha Vantage: fetched {} {} bars for {}",
            series.len(),
            granularity,
            symbol
        );
        Ok(series)
    }

    async fn overview(&self, symbol: &Symbol) -> Result<CompanyOverview, QuoteError> {
        let text = self
            .fetch(&[("function", "OVERVIEW"), ("symbol", symbol.as_str())])
            .await?;
        let overview = Self::parse_overview(symbol, &text)?;

        debug!("Alpha Vantage: fetched company overview for {}", symbol);
        Ok(overview)
    }
}
