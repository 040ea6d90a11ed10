use std::env;
use std::time::Duration;

use tickerview_quotes::{CacheConfig, OutputSize, ProviderKind, ResolverConfig};

/// Environment-driven settings. `.env` is loaded by `main` before this runs.
#[derive(Clone, Debug)]
pub struct Config {
    pub resolver: ResolverConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = get("TICKERVIEW_PROVIDER")
            .and_then(|v| match v.parse::<ProviderKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    tracing::warn!("Ignoring TICKERVIEW_PROVIDER: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let api_key = get("TICKERVIEW_API_KEY")
            .or_else(|| match provider {
                ProviderKind::AlphaVantage => get("ALPHAVANTAGE_API_KEY"),
                ProviderKind::Fmp => get("FMP_API_KEY"),
                ProviderKind::Demo => None,
            })
            .unwrap_or_default();

        let timeout = get("TICKERVIEW_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let output_size = get("TICKERVIEW_OUTPUT_SIZE")
            .and_then(|v| v.parse::<OutputSize>().ok())
            .unwrap_or_default();

        let cache = if get("TICKERVIEW_CACHE").is_some_and(|v| is_off(&v)) {
            CacheConfig::disabled()
        } else {
            CacheConfig::default()
        };

        let demo_fallback = !get("TICKERVIEW_DEMO_FALLBACK").is_some_and(|v| is_off(&v));

        let mut resolver = ResolverConfig::live(provider, api_key)
            .with_cache(cache)
            .with_demo_fallback(demo_fallback);
        resolver.output_size = output_size;
        resolver.base_url = get("TICKERVIEW_BASE_URL");
        if let Some(timeout) = timeout {
            resolver.timeout = timeout;
        }

        Self { resolver }
    }
}

fn is_off(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "0" | "off" | "false" | "no" | "disabled"
    )
}
