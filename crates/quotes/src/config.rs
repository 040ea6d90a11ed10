//! Resolver configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;
use crate::provider::alpha_vantage::OutputSize;
use crate::provider::http::DEFAULT_TIMEOUT;

/// Which live provider the resolver talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    AlphaVantage,
    Fmp,
    /// No live provider; every answer comes from the demo table.
    Demo,
}

impl ProviderKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlphaVantage => "alpha_vantage",
            Self::Fmp => "fmp",
            Self::Demo => "demo",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "alpha_vantage" | "alphavantage" | "av" => Ok(Self::AlphaVantage),
            "fmp" | "financial_modeling_prep" => Ok(Self::Fmp),
            "demo" => Ok(Self::Demo),
            other => Err(QuoteError::Validation(format!(
                "Unknown provider '{}'; expected alpha_vantage, fmp or demo",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time-to-live per query kind. Caching is off when `enabled` is false.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub enabled: bool,
    pub quote_ttl: Duration,
    pub history_ttl: Duration,
    pub overview_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quote_ttl: Duration::from_secs(60),
            history_ttl: Duration::from_secs(300),
            overview_ttl: Duration::from_secs(86_400),
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Everything needed to build a [`QuoteResolver`](crate::QuoteResolver).
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub provider: ProviderKind,
    /// Provider credential. Empty means "no credential": demo mode.
    pub api_key: String,
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// `outputsize` for daily Alpha Vantage series.
    pub output_size: OutputSize,
    pub cache: CacheConfig,
    /// Answer with demo data when a live quote fails for a provider-side reason.
    pub demo_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: String::new(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            output_size: OutputSize::default(),
            cache: CacheConfig::default(),
            demo_fallback: true,
        }
    }
}

impl ResolverConfig {
    /// Config for a live provider with the given credential.
    pub fn live(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Config that never touches the network.
    pub fn demo() -> Self {
        Self {
            provider: ProviderKind::Demo,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    /// True when lookups should go straight to the demo provider.
    pub fn is_demo_mode(&self) -> bool {
        self.provider == ProviderKind::Demo || self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("alpha_vantage".parse::<ProviderKind>().unwrap(), ProviderKind::AlphaVantage);
        assert_eq!("Alpha-Vantage".parse::<ProviderKind>().unwrap(), ProviderKind::AlphaVantage);
        assert_eq!("FMP".parse::<ProviderKind>().unwrap(), ProviderKind::Fmp);
        assert_eq!(" demo ".parse::<ProviderKind>().unwrap(), ProviderKind::Demo);
        assert!(matches!(
            "yahoo".parse::<ProviderKind>(),
            Err(QuoteError::Validation(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.output_size, OutputSize::Full);
        assert!(config.demo_fallback);
        assert_eq!(config.cache.quote_ttl, Duration::from_secs(60));
        assert_eq!(config.cache.history_ttl, Duration::from_secs(300));
        assert_eq!(config.cache.overview_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn test_demo_mode_without_credential() {
        assert!(ResolverConfig::default().is_demo_mode());
        assert!(ResolverConfig::live(ProviderKind::Fmp, "  ").is_demo_mode());
        assert!(ResolverConfig::demo().is_demo_mode());
        assert!(!ResolverConfig::live(ProviderKind::AlphaVantage, "key").is_demo_mode());
    }
}
