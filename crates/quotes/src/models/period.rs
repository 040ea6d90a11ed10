use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;

use super::history::Granularity;

/// Named lookback window.
///
/// Each period maps to a fixed bar count. The counts approximate trading
/// days and ignore the actual exchange calendar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1m")]
    OneMonth,
    #[default]
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "all", alias = "max")]
    All,
}

const ALL_GRANULARITIES: &[Granularity] =
    &[Granularity::Daily, Granularity::Weekly, Granularity::Monthly];

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
        Period::All,
    ];

    /// Number of leading bars this window keeps; `None` keeps everything.
    pub fn bar_limit(&self) -> Option<usize> {
        match self {
            Self::OneDay => Some(1),
            Self::FiveDays => Some(5),
            Self::OneMonth => Some(21),
            Self::ThreeMonths => Some(63),
            Self::SixMonths => Some(126),
            Self::OneYear => Some(252),
            Self::FiveYears => Some(1260),
            Self::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
            Self::All => "all",
        }
    }

    /// Human readable name ("3 Months").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OneDay => "1 Day",
            Self::FiveDays => "5 Days",
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
            Self::FiveYears => "5 Years",
            Self::All => "All",
        }
    }

    /// Granularities that produce a meaningful number of bars for this window.
    pub fn allowed_granularities(&self) -> &'static [Granularity] {
        match self {
            Self::OneDay | Self::FiveDays => &ALL_GRANULARITIES[..1],
            Self::OneMonth | Self::ThreeMonths => &ALL_GRANULARITIES[..2],
            _ => ALL_GRANULARITIES,
        }
    }

    pub fn supports(&self, granularity: Granularity) -> bool {
        self.allowed_granularities().contains(&granularity)
    }
}

impl FromStr for Period {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "5d" => Ok(Self::FiveDays),
            "1m" => Ok(Self::OneMonth),
            "3m" => Ok(Self::ThreeMonths),
            "6m" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "5y" => Ok(Self::FiveYears),
            "all" | "max" => Ok(Self::All),
            other => Err(QuoteError::Validation(format!(
                "Unknown period '{}'; expected one of 1d, 5d, 1m, 3m, 6m, 1y, 5y, all",
                other
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
