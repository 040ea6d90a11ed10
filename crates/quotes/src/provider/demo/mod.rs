//! Demo quote provider.
//!
//! Answers without any network access: well-known tickers come from a
//! static table, every other valid symbol gets a synthetic quote. Quotes
//! produced here are always marked as demo data through their origin.

use async_trait::async_trait;
use log::debug;
use num_traits::FromPrimitive;
use rand::Rng;
use rust_decimal::Decimal;

use crate::errors::QuoteError;
use crate::models::{CompanyOverview, Quote, QuoteOrigin, Symbol};
use crate::provider::{ProviderCapabilities, QuoteProvider};

pub const PROVIDER_ID: &str = "DEMO";

const SYNTHETIC_PRICE_MIN: f64 = 50.0;
const SYNTHETIC_PRICE_MAX: f64 = 500.0;
const SYNTHETIC_CHANGE_MAX: f64 = 10.0;

/// Static demo figures for a well-known ticker.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoEntry {
    pub symbol: &'static str,
    pub name: &'static str,
    pub price: Decimal,
    pub change: Decimal,
    /// Whole percent
    pub change_percent: Decimal,
}

// (symbol, name, price, change, change percent), all in hundredths
const DEMO_TABLE: &[(&str, &str, i64, i64, i64)] = &[
    ("AAPL", "Apple Inc.", 18850, 275, 148),
    ("MSFT", "Microsoft Corporation", 41526, 312, 76),
    ("GOOGL", "Alphabet Inc.", 14180, -95, -67),
    ("AMZN", "Amazon.com Inc.", 17825, 187, 106),
    ("META", "Meta Platforms Inc.", 50230, 645, 130),
    ("NVDA", "NVIDIA Corporation", 87540, 1820, 212),
    ("TSLA", "Tesla Inc.", 17510, -435, -242),
    ("IBM", "International Business Machines", 19123, -57, -30),
    ("NFLX", "Netflix Inc.", 60588, 410, 68),
    ("JPM", "JPMorgan Chase & Co.", 19662, 105, 54),
];

/// Look up a symbol in the static demo table.
pub fn demo_entry(symbol: &Symbol) -> Option<DemoEntry> {
    DEMO_TABLE
        .iter()
        .find(|(s, ..)| *s == symbol.as_str())
        .map(|&(symbol, name, price, change, pct)| DemoEntry {
            symbol,
            name,
            price: Decimal::new(price, 2),
            change: Decimal::new(change, 2),
            change_percent: Decimal::new(pct, 2),
        })
}

/// Symbols present in the demo table, in table order.
pub fn demo_symbols() -> impl Iterator<Item = &'static str> {
    DEMO_TABLE.iter().map(|(s, ..)| *s)
}

fn two_places(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

/// Generate a plausible quote for a symbol outside the table.
fn synthesize(symbol: &Symbol) -> Quote {
    let mut rng = rand::thread_rng();
    let price = two_places(rng.gen_range(SYNTHETIC_PRICE_MIN..=SYNTHETIC_PRICE_MAX));
    let change = two_places(rng.gen_range(-SYNTHETIC_CHANGE_MAX..=SYNTHETIC_CHANGE_MAX));
    let change_percent = (change / price * Decimal::ONE_HUNDRED).round_dp(2);

    Quote::new(
        symbol.as_str(),
        price,
        change,
        change_percent,
        PROVIDER_ID,
        QuoteOrigin::Synthetic,
    )
}

/// Resolve a demo quote: table entry first, synthetic otherwise.
///
/// Never fails for a validated symbol.
pub fn resolve_demo(symbol: &Symbol) -> Quote {
    match demo_entry(symbol) {
        Some(entry) => Quote::new(
            entry.symbol,
            entry.price,
            entry.change,
            entry.change_percent,
            PROVIDER_ID,
            QuoteOrigin::DemoTable,
        )
        .with_name(entry.name),
        None => {
            debug!("DEMO: synthesizing quote for {}", symbol);
            synthesize(symbol)
        }
    }
}

/// Provider used when no credential is configured.
///
/// Quotes for any symbol, overviews (name only) for table symbols, no history.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoProvider;

impl DemoProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuoteProvider for DemoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_history: false,
            supports_overview: true,
        }
    }

    async fn latest_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        Ok(resolve_demo(symbol))
    }

    async fn overview(&self, symbol: &Symbol) -> Result<CompanyOverview, QuoteError> {
        let entry = demo_entry(symbol).ok_or_else(|| QuoteError::NotFound(symbol.to_string()))?;
        Ok(CompanyOverview {
            source: Some(PROVIDER_ID.to_string()),
            symbol: Some(entry.symbol.to_string()),
            ..CompanyOverview::with_name(entry.name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::models::Granularity;
    use rust_decimal_macros::dec;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn test_table_entry_is_deterministic() {
        let first = resolve_demo(&sym("aapl"));
        let second = resolve_demo(&sym("AAPL"));

        assert_eq!(first, second);
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first.name.as_deref(), Some("Apple Inc."));
        assert_eq!(first.price, dec!(188.50));
        assert_eq!(first.change, dec!(2.75));
        assert_eq!(first.change_percent, dec!(1.48));
        assert_eq!(first.source, "DEMO");
        assert_eq!(first.origin, QuoteOrigin::DemoTable);
        assert!(first.is_demo());
    }

    #[test]
    fn test_table_contains_well_known_symbols() {
        let symbols: Vec<_> = demo_symbols().collect();
        for expected in ["AAPL", "MSFT", "GOOGL", "AMZN", "IBM"] {
            assert!(symbols.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_synthetic_quote_is_consistent() {
        for _ in 0..200 {
            let quote = resolve_demo(&sym("ZZZZ"));

            assert_eq!(quote.symbol, "ZZZZ");
            assert_eq!(quote.origin, QuoteOrigin::Synthetic);
            assert_eq!(quote.source, "DEMO");
            assert!(quote.price >= dec!(50) && quote.price <= dec!(500));
            assert!(quote.change >= dec!(-10) && quote.change <= dec!(10));
            assert!(quote.price.scale() <= 2);
            assert!(quote.change.scale() <= 2);
            assert_eq!(
                quote.change_percent,
                (quote.change / quote.price * dec!(100)).round_dp(2)
            );
            assert!(quote.high.is_none() && quote.volume.is_none());
        }
    }

    #[tokio::test]
    async fn test_demo_provider_overview() {
        let provider = DemoProvider::new();

        let overview = provider.overview(&sym("MSFT")).await.unwrap();
        assert_eq!(overview.name.as_deref(), Some("Microsoft Corporation"));
        assert!(!overview.has_fundamentals());

        let err = provider.overview(&sym("ZZZZ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_demo_provider_has_no_history() {
        let err = DemoProvider::new()
            .history(&sym("AAPL"), Granularity::Daily)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Unsupported { .. }));
    }
}
