//! Quote resolver.
//!
//! The resolver sits in front of one live provider and handles:
//! - Symbol validation before any network call
//! - The per-kind TTL cache
//! - Demo resolution when no credential is configured
//! - Falling back to demo quotes when the live provider fails for a
//!   provider-side reason
//! - Sequential dashboard lookups (quote, overview, history)

mod snapshot;

pub use snapshot::{QuoteResolution, Snapshot};

use std::sync::Arc;

use log::{debug, info, warn};

use crate::cache::{CacheKey, CachedResponse, QueryKind, ResponseCache};
use crate::config::{CacheConfig, ProviderKind, ResolverConfig};
use crate::errors::QuoteError;
use crate::models::{
    filter_by_period, CompanyOverview, Granularity, HistoricalSeries, Period, QuoteOrigin,
    RequestContext, Symbol,
};
use crate::provider::alpha_vantage::{self, AlphaVantageProvider};
use crate::provider::demo::{self, resolve_demo, DemoProvider};
use crate::provider::fmp::{self, FmpProvider};
use crate::provider::QuoteProvider;

/// Resolves quotes, history and overviews for user-supplied symbols.
pub struct QuoteResolver {
    provider: Arc<dyn QuoteProvider>,
    demo: DemoProvider,
    cache: ResponseCache,
    demo_fallback: bool,
}

impl QuoteResolver {
    /// Create a resolver around an existing provider.
    pub fn new(provider: Arc<dyn QuoteProvider>, cache: CacheConfig, demo_fallback: bool) -> Self {
        Self {
            provider,
            demo: DemoProvider::new(),
            cache: ResponseCache::new(cache),
            demo_fallback,
        }
    }

    /// Build the provider named by `config`.
    ///
    /// Without a credential the resolver runs in demo mode whatever
    /// provider kind was asked for.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let api_key = config.api_key.trim().to_string();

        let provider: Arc<dyn QuoteProvider> = if config.is_demo_mode() {
            if config.provider != ProviderKind::Demo {
                warn!(
                    "No API key configured for {}, using demo data",
                    config.provider
                );
            }
            Arc::new(DemoProvider::new())
        } else {
            match config.provider {
                ProviderKind::AlphaVantage => Arc::new(AlphaVantageProvider::with_options(
                    api_key,
                    config
                        .base_url
                        .clone()
                        .unwrap_or_else(|| alpha_vantage::BASE_URL.to_string()),
                    config.timeout,
                    config.output_size,
                )),
                ProviderKind::Fmp => Arc::new(FmpProvider::with_options(
                    api_key,
                    config
                        .base_url
                        .clone()
                        .unwrap_or_else(|| fmp::BASE_URL.to_string()),
                    config.timeout,
                )),
                ProviderKind::Demo => Arc::new(DemoProvider::new()),
            }
        };

        match provider.rate_limit().describe() {
            Some(quota) => info!("Quote resolver using provider '{}' ({})", provider.id(), quota),
            None => info!("Quote resolver using provider '{}'", provider.id()),
        }

        Self::new(provider, config.cache.clone(), config.demo_fallback)
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    /// True when every answer comes from the demo provider.
    pub fn is_demo_mode(&self) -> bool {
        self.provider.id() == demo::PROVIDER_ID
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn unsupported(&self, operation: &str) -> QuoteError {
        QuoteError::Unsupported {
            provider: self.provider.id().to_string(),
            operation: operation.to_string(),
        }
    }

    fn cached(&self, context: &RequestContext, key: &CacheKey) -> Option<CachedResponse> {
        if context.force_refresh {
            debug!("Cache bypassed for {:?} {}", key.kind, key.symbol);
            return None;
        }
        self.cache.get(key)
    }

    /// Fetch the latest quote for `raw_symbol`.
    ///
    /// Invalid input fails with `Validation` before any network call. When
    /// demo fallback is enabled, a rate limit, provider error or unparseable
    /// payload is answered with a demo quote that carries the live error.
    pub async fn fetch_quote(
        &self,
        context: &RequestContext,
        raw_symbol: &str,
    ) -> Result<QuoteResolution, QuoteError> {
        let symbol = Symbol::parse(raw_symbol)?;
        let key = CacheKey::new(&symbol, QueryKind::Quote);

        if let Some(CachedResponse::Quote(quote)) = self.cached(context, &key) {
            return Ok(QuoteResolution::live(quote));
        }

        match self.provider.latest_quote(&symbol).await {
            Ok(quote) => {
                if !quote.is_demo() {
                    self.cache.insert(key, CachedResponse::Quote(quote.clone()));
                }
                Ok(QuoteResolution::live(quote))
            }
            Err(e) if self.demo_fallback && e.allows_demo_fallback() => {
                warn!(
                    "Live quote for {} failed ({}), falling back to demo data",
                    symbol, e
                );
                Ok(QuoteResolution::fallback(resolve_demo(&symbol), e))
            }
            Err(e) => {
                debug!("Quote for {} failed: {}", symbol, e);
                Err(e)
            }
        }
    }

    /// Fetch the full historical series for `raw_symbol`, most recent first.
    pub async fn fetch_history(
        &self,
        context: &RequestContext,
        raw_symbol: &str,
        granularity: Granularity,
    ) -> Result<HistoricalSeries, QuoteError> {
        let symbol = Symbol::parse(raw_symbol)?;
        if !self.provider.capabilities().supports_history {
            return Err(self.unsupported("historical data"));
        }
        let key = CacheKey::new(&symbol, QueryKind::History(granularity));

        if let Some(CachedResponse::History(series)) = self.cached(context, &key) {
            return Ok(series);
        }

        let series = self.provider.history(&symbol, granularity).await?;
        if !self.is_demo_mode() {
            self.cache
                .insert(key, CachedResponse::History(series.clone()));
        }
        Ok(series)
    }

    /// Fetch company fundamentals for `raw_symbol`.
    pub async fn fetch_overview(
        &self,
        context: &RequestContext,
        raw_symbol: &str,
    ) -> Result<CompanyOverview, QuoteError> {
        let symbol = Symbol::parse(raw_symbol)?;
        if !self.provider.capabilities().supports_overview {
            return Err(self.unsupported("company overview"));
        }
        let key = CacheKey::new(&symbol, QueryKind::Overview);

        if let Some(CachedResponse::Overview(overview)) = self.cached(context, &key) {
            return Ok(overview);
        }

        let overview = self.provider.overview(&symbol).await?;
        if !self.is_demo_mode() {
            self.cache
                .insert(key, CachedResponse::Overview(overview.clone()));
        }
        Ok(overview)
    }

    /// Dashboard lookup: quote, then overview, then history cut to `period`.
    ///
    /// Only the quote can fail the whole lookup. Operations the provider
    /// does not offer are left out without a warning. When the quote itself
    /// fell back to demo data the live provider is not called again; the
    /// demo overview supplies the name and history is left out. A synthetic
    /// quote has no company behind it, so it gets no overview at all.
    pub async fn fetch_snapshot(
        &self,
        context: &RequestContext,
        raw_symbol: &str,
        granularity: Granularity,
        period: Period,
    ) -> Result<Snapshot, QuoteError> {
        let symbol = Symbol::parse(raw_symbol)?;
        if !period.supports(granularity) {
            return Err(QuoteError::Validation(format!(
                "The {} interval is not available for {}",
                granularity,
                period.display_name()
            )));
        }

        let quote = self.fetch_quote(context, symbol.as_str()).await?;
        let capabilities = self.provider.capabilities();
        let mut warnings = Vec::new();

        let overview = if quote.quote.origin == QuoteOrigin::Synthetic {
            None
        } else if quote.is_fallback() {
            Some(self.demo.overview(&symbol).await)
        } else if capabilities.supports_overview {
            Some(self.fetch_overview(context, symbol.as_str()).await)
        } else {
            None
        };
        let overview = match overview {
            None => None,
            Some(Ok(overview)) => Some(overview),
            Some(Err(e)) if e.is_rate_limit() => {
                debug!("Overview for {} skipped: {}", symbol, e);
                None
            }
            Some(Err(e)) => {
                warn!("Overview for {} unavailable: {}", symbol, e);
                warnings.push(e);
                None
            }
        };

        let history = if quote.is_fallback() || !capabilities.supports_history {
            None
        } else {
            match self.fetch_history(context, symbol.as_str(), granularity).await {
                Ok(series) => Some(filter_by_period(&series, period)),
                Err(e) => {
                    warn!("History for {} unavailable: {}", symbol, e);
                    warnings.push(e);
                    None
                }
            }
        };

        let display_name = overview
            .as_ref()
            .and_then(|o| o.name.clone())
            .or_else(|| quote.quote.name.clone())
            .unwrap_or_else(|| symbol.to_string());

        Ok(Snapshot {
            quote,
            display_name,
            overview,
            history,
            period,
            warnings,
        })
    }
}
