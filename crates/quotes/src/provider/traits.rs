//! Quote provider trait definitions.

use async_trait::async_trait;

use crate::errors::QuoteError;
use crate::models::{CompanyOverview, Granularity, HistoricalSeries, Quote, Symbol};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for quote providers.
///
/// Implement this trait to add support for a new market data source.
/// The resolver uses the provider's capabilities to decide which
/// operations it may call.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tickerview_quotes::provider::{ProviderCapabilities, QuoteProvider, RateLimit};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             supports_history: false,
///             supports_overview: false,
///         }
///     }
///
///     async fn latest_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// A constant string like "ALPHA_VANTAGE" or "FMP", used for logging,
    /// error messages and the `source` field of quotes.
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Published call quota.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::unlimited()
    }

    /// Fetch the latest quote for a symbol.
    async fn latest_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError>;

    /// Fetch the full available historical series, most recent first.
    ///
    /// Default implementation returns `Unsupported`.
    async fn history(
        &self,
        symbol: &Symbol,
        granularity: Granularity,
    ) -> Result<HistoricalSeries, QuoteError> {
        let _ = (symbol, granularity);
        Err(QuoteError::Unsupported {
            provider: self.id().to_string(),
            operation: "historical data".to_string(),
        })
    }

    /// Fetch company fundamentals.
    ///
    /// Default implementation returns `Unsupported`.
    async fn overview(&self, symbol: &Symbol) -> Result<CompanyOverview, QuoteError> {
        let _ = symbol;
        Err(QuoteError::Unsupported {
            provider: self.id().to_string(),
            operation: "company overview".to_string(),
        })
    }
}
