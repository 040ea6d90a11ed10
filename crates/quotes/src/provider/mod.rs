//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Provider capabilities and published rate limits
//! - Shared HTTP and payload parsing helpers
//! - Concrete providers (Alpha Vantage, Financial Modeling Prep, Demo)
//!
//! Providers receive an already validated [`Symbol`](crate::models::Symbol);
//! input validation happens in the resolver, before any network call.

mod capabilities;
pub(crate) mod http;
mod parse;
mod traits;

pub mod alpha_vantage;
pub mod demo;
pub mod fmp;

// Re-exports
pub use capabilities::{ProviderCapabilities, RateLimit};
pub use traits::QuoteProvider;
