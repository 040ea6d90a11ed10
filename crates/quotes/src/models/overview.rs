use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Company fundamentals from a market data provider.
///
/// Every field is optional; providers omit fields freely.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    /// Provider that supplied this overview (e.g., "ALPHA_VANTAGE")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    /// Company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Asset type (e.g., "Common Stock", "ETF")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,

    /// Business description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Listing exchange (e.g., "NYSE")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Business sector (e.g., "TECHNOLOGY")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Industry within sector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,

    /// Price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<Decimal>,

    /// Earnings per share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<Decimal>,

    /// Dividend yield as a fraction (0.0455 for 4.55%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<Decimal>,

    /// Number of full-time employees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u64>,
}

impl CompanyOverview {
    /// Create an overview with just a name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the sector
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set the industry
    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// True when at least one valuation figure is present.
    pub fn has_fundamentals(&self) -> bool {
        self.market_cap.is_some()
            || self.pe_ratio.is_some()
            || self.eps.is_some()
            || self.dividend_yield.is_some()
            || self.week_52_high.is_some()
            || self.week_52_low.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overview_builder() {
        let overview = CompanyOverview::with_name("Apple Inc.")
            .sector("Technology")
            .industry("Consumer Electronics");

        assert_eq!(overview.name, Some("Apple Inc.".to_string()));
        assert_eq!(overview.sector, Some("Technology".to_string()));
        assert_eq!(overview.industry, Some("Consumer Electronics".to_string()));
        assert!(!overview.has_fundamentals());
    }

    #[test]
    fn test_overview_serialization() {
        let overview = CompanyOverview {
            name: Some("Test Company".to_string()),
            pe_ratio: Some(dec!(22.5)),
            ..Default::default()
        };

        let json = serde_json::to_string(&overview).unwrap();
        assert!(json.contains("Test Company"));
        assert!(json.contains("22.5"));
        // Optional None fields should not be serialized
        assert!(!json.contains("exchange"));
    }
}
