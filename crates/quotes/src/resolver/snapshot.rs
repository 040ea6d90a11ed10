use serde::Serialize;

use crate::errors::QuoteError;
use crate::models::{CompanyOverview, HistoricalSeries, Period, Quote};

/// Outcome of a quote lookup.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteResolution {
    pub quote: Quote,

    /// The live failure that was answered with demo data instead.
    #[serde(skip)]
    pub fallback_reason: Option<QuoteError>,
}

impl QuoteResolution {
    pub fn live(quote: Quote) -> Self {
        Self {
            quote,
            fallback_reason: None,
        }
    }

    pub fn fallback(quote: Quote, reason: QuoteError) -> Self {
        Self {
            quote,
            fallback_reason: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    /// True when the quote is not live market data.
    pub fn is_demo(&self) -> bool {
        self.quote.is_demo()
    }
}

/// Everything a dashboard shows for one symbol.
///
/// Only the quote is mandatory. Overview and history failures end up in
/// `warnings`, except rate limits on the overview, which are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub quote: QuoteResolution,
    /// Company name, or the symbol when no overview is available.
    pub display_name: String,
    pub overview: Option<CompanyOverview>,
    /// History already cut to `period`.
    pub history: Option<HistoricalSeries>,
    pub period: Period,
    pub warnings: Vec<QuoteError>,
}

impl Snapshot {
    pub fn symbol(&self) -> &str {
        &self.quote.quote.symbol
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
