//! Quote resolution models
//!
//! This module contains the core data types:
//! - `symbol` - Validated ticker symbol (Symbol)
//! - `quote` - Point-in-time price snapshot (Quote, QuoteOrigin)
//! - `history` - Historical bars and window filtering (Bar, HistoricalSeries, Granularity)
//! - `period` - Named lookback windows (Period)
//! - `overview` - Sparse company fundamentals (CompanyOverview)
//! - `context` - Request-scoped options (RequestContext)

mod context;
mod history;
mod overview;
mod period;
mod quote;
mod symbol;

pub use context::RequestContext;
pub use history::{filter_by_period, Bar, Granularity, HistoricalSeries};
pub use overview::CompanyOverview;
pub use period::Period;
pub use quote::{Quote, QuoteOrigin};
pub use symbol::Symbol;
