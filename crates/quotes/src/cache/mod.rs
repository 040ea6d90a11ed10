//! TTL cache for successful live responses.
//!
//! Entries are keyed by (symbol, query kind); each kind has its own
//! time-to-live. Expired entries are dropped when they are looked up, and
//! every insert sweeps the rest, so symbols looked up once do not linger.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::config::CacheConfig;
use crate::models::{CompanyOverview, Granularity, HistoricalSeries, Quote, Symbol};

/// What was asked for. History is cached per granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Quote,
    History(Granularity),
    Overview,
}

/// Cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: Symbol,
    pub kind: QueryKind,
}

impl CacheKey {
    pub fn new(symbol: &Symbol, kind: QueryKind) -> Self {
        Self {
            symbol: symbol.clone(),
            kind,
        }
    }
}

/// A cached response.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedResponse {
    Quote(Quote),
    History(HistoricalSeries),
    Overview(CompanyOverview),
}

#[derive(Debug)]
struct CacheEntry {
    response: CachedResponse,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) >= self.ttl
    }
}

/// Thread-safe response cache owned by the resolver.
pub struct ResponseCache {
    config: CacheConfig,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn ttl_for(&self, kind: QueryKind) -> Duration {
        match kind {
            QueryKind::Quote => self.config.quote_ttl,
            QueryKind::History(_) => self.config.history_ttl,
            QueryKind::Overview => self.config.overview_ttl,
        }
    }

    /// Lock the entries, recovering from poison.
    ///
    /// A poisoned cache only risks a stale or missing entry.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Response cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up a live entry; an expired one is evicted.
    pub fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        if !self.config.enabled {
            return None;
        }

        let mut entries = self.lock_entries();
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                debug!("Cache: evicted expired {:?} for {}", key.kind, key.symbol);
                None
            }
            Some(entry) => {
                debug!("Cache: hit {:?} for {}", key.kind, key.symbol);
                Some(entry.response.clone())
            }
            None => None,
        }
    }

    /// Store a response, replacing any previous entry for the key.
    ///
    /// Expired entries are swept first.
    pub fn insert(&self, key: CacheKey, response: CachedResponse) {
        if !self.config.enabled {
            return;
        }

        let ttl = self.ttl_for(key.kind);
        let now = Instant::now();
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        if entries.len() < before {
            debug!("Cache: swept {} expired entries", before - entries.len());
        }
        entries.insert(
            key,
            CacheEntry {
                response,
                stored_at: now,
                ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.lock_entries().remove(key);
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock_entries();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteOrigin;
    use rust_decimal_macros::dec;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    fn quote(symbol: &str) -> CachedResponse {
        CachedResponse::Quote(Quote::new(
            symbol,
            dec!(10.00),
            dec!(0.10),
            dec!(1.01),
            "ALPHA_VANTAGE",
            QuoteOrigin::Live,
        ))
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new(CacheConfig::default());
        let key = CacheKey::new(&sym("IBM"), QueryKind::Quote);

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), quote("IBM"));
        assert_eq!(cache.get(&key), Some(quote("IBM")));
    }

    #[test]
    fn test_keys_are_per_kind_and_granularity() {
        let cache = ResponseCache::new(CacheConfig::default());
        let ibm = sym("IBM");
        cache.insert(CacheKey::new(&ibm, QueryKind::Quote), quote("IBM"));

        assert!(cache.get(&CacheKey::new(&ibm, QueryKind::Overview)).is_none());
        assert!(cache
            .get(&CacheKey::new(&ibm, QueryKind::History(Granularity::Daily)))
            .is_none());
        assert!(cache.get(&CacheKey::new(&sym("AAPL"), QueryKind::Quote)).is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_access() {
        let cache = ResponseCache::new(CacheConfig {
            quote_ttl: Duration::ZERO,
            ..CacheConfig::default()
        });
        let key = CacheKey::new(&sym("IBM"), QueryKind::Quote);

        cache.insert(key.clone(), quote("IBM"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = ResponseCache::new(CacheConfig {
            quote_ttl: Duration::ZERO,
            ..CacheConfig::default()
        });
        let ibm = sym("IBM");
        cache.insert(
            CacheKey::new(&ibm, QueryKind::Overview),
            CachedResponse::Overview(CompanyOverview::with_name("IBM")),
        );
        cache.insert(CacheKey::new(&ibm, QueryKind::Quote), quote("IBM"));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_sweeps_expired_entries() {
        let cache = ResponseCache::new(CacheConfig {
            quote_ttl: Duration::ZERO,
            ..CacheConfig::default()
        });
        for symbol in ["AAPL", "MSFT", "NFLX"] {
            cache.insert(CacheKey::new(&sym(symbol), QueryKind::Quote), quote(symbol));
        }
        // each insert dropped the previous, already expired quote
        assert_eq!(cache.len(), 1);

        cache.insert(
            CacheKey::new(&sym("IBM"), QueryKind::Overview),
            CachedResponse::Overview(CompanyOverview::with_name("IBM")),
        );
        assert_eq!(cache.len(), 1);
        assert!(cache
            .get(&CacheKey::new(&sym("IBM"), QueryKind::Overview))
            .is_some());
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = ResponseCache::new(CacheConfig::disabled());
        let key = CacheKey::new(&sym("IBM"), QueryKind::Quote);

        cache.insert(key.clone(), quote("IBM"));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let cache = ResponseCache::new(CacheConfig::default());
        let key = CacheKey::new(&sym("IBM"), QueryKind::Quote);

        cache.insert(key.clone(), quote("IBM"));
        cache.invalidate(&key);
        assert!(cache.get(&key).is_none());
    }
}
