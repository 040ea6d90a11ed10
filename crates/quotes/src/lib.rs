//! Tickerview Quotes Crate
//!
//! This crate resolves stock quotes, historical series and company
//! overviews from third-party market data APIs, and normalizes them into
//! provider-agnostic types.
//!
//! # Overview
//!
//! The quotes crate supports:
//! - Multiple providers: Alpha Vantage, Financial Modeling Prep, offline demo data
//! - Symbol validation before any network call
//! - A classified error taxonomy with user guidance
//! - A per-kind TTL response cache
//! - Demo fallback when no credential is configured or a live call fails
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   user input     |  ("ibm ")
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  QuoteResolver   | --> |  ResponseCache   |
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  QuoteProvider   | --> |   DemoProvider   |  (no key / fallback)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | Quote / Series / |
//! |    Overview      |
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Symbol`] - Validated, canonical ticker
//! - [`Quote`] - Point-in-time price snapshot; percent change in whole percent
//! - [`HistoricalSeries`] - OHLCV bars, most recent first
//! - [`Period`] - Named lookback window, see [`filter_by_period`]
//! - [`CompanyOverview`] - Sparse company fundamentals
//! - [`QuoteError`] - Error classification, see [`ErrorKind`] and [`Guidance`]

pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{
    filter_by_period, Bar, CompanyOverview, Granularity, HistoricalSeries, Period, Quote,
    QuoteOrigin, RequestContext, Symbol,
};

// Re-export error types
pub use errors::{ErrorKind, Guidance, ProviderErrorKind, QuoteError};

// Re-export configuration and resolver
pub use config::{CacheConfig, ProviderKind, ResolverConfig};
pub use resolver::{QuoteResolution, QuoteResolver, Snapshot};

// Re-export provider types
pub use provider::alpha_vantage::{AlphaVantageProvider, OutputSize};
pub use provider::demo::{demo_entry, demo_symbols, resolve_demo, DemoEntry, DemoProvider};
pub use provider::fmp::FmpProvider;
pub use provider::{ProviderCapabilities, QuoteProvider, RateLimit};
