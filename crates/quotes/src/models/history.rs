use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;

use super::period::Period;

/// Sampling frequency of a historical series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for Granularity {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Self::Daily),
            "weekly" | "w" => Ok(Self::Weekly),
            "monthly" | "m" => Ok(Self::Monthly),
            other => Err(QuoteError::Validation(format!(
                "Unknown interval '{}'; expected daily, weekly or monthly",
                other
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One OHLCV bar.
///
/// Serialized with provider-agnostic keys: `Date`, `Open`, `High`, `Low`,
/// `Close`, `Volume`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

impl Bar {
    /// True when the bar closed at or above its open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Historical bars for a symbol, most recent first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub symbol: String,
    pub granularity: Granularity,
    bars: Vec<Bar>,
}

impl HistoricalSeries {
    /// Build a series; bars are put in descending date order.
    pub fn new(symbol: impl Into<String>, granularity: Granularity, mut bars: Vec<Bar>) -> Self {
        bars.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            symbol: symbol.into(),
            granularity,
            bars,
        }
    }

    /// Bars, most recent first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Bars in ascending date order, as a chart would plot them.
    pub fn chronological(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter().rev()
    }

    /// Simple moving average of the most recent `window` closes.
    ///
    /// `None` when `window` is zero or the series is shorter than `window`.
    pub fn moving_average(&self, window: usize) -> Option<Decimal> {
        if window == 0 || self.bars.len() < window {
            return None;
        }
        let sum: Decimal = self.bars[..window].iter().map(|bar| bar.close).sum();
        Some(sum / Decimal::from(window as u64))
    }
}

/// Keep the leading bars of `series` that fall inside `period`.
///
/// The window is a fixed bar count, so the result holds
/// `min(limit, series.len())` bars in their original order. An empty result
/// is a valid empty series.
pub fn filter_by_period(series: &HistoricalSeries, period: Period) -> HistoricalSeries {
    let take = period
        .bar_limit()
        .map_or(series.bars.len(), |limit| limit.min(series.bars.len()));

    HistoricalSeries {
        symbol: series.symbol.clone(),
        granularity: series.granularity,
        bars: series.bars[..take].to_vec(),
    }
}
