use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a quote came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteOrigin {
    /// Answered by a live provider.
    Live,
    /// Taken from the static demo table.
    DemoTable,
    /// Generated on the fly for an unknown symbol.
    Synthetic,
}

impl QuoteOrigin {
    /// True for anything that is not live market data.
    pub fn is_demo(&self) -> bool {
        !matches!(self, Self::Live)
    }
}

/// Point-in-time price snapshot for a symbol.
///
/// `change_percent` is always in whole percent units (`1.48` means 1.48%),
/// whatever unit the provider used on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Canonical (uppercase) symbol
    pub symbol: String,

    /// Display name, when the provider supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Latest price
    pub price: Decimal,

    /// Absolute change against the previous close
    pub change: Decimal,

    /// Relative change in percent
    pub change_percent: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// Day high
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Day low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_trading_day: Option<NaiveDate>,

    /// Provider id (ALPHA_VANTAGE, FMP, DEMO)
    pub source: String,

    pub origin: QuoteOrigin,
}

impl Quote {
    /// Create a quote with only the price fields set.
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        change: Decimal,
        change_percent: Decimal,
        source: impl Into<String>,
        origin: QuoteOrigin,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            price,
            change,
            change_percent,
            previous_close: None,
            open: None,
            high: None,
            low: None,
            volume: None,
            latest_trading_day: None,
            source: source.into(),
            origin,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_demo(&self) -> bool {
        self.origin.is_demo()
    }

    /// Name to show for this quote, falling back to the symbol.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}
