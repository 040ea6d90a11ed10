//! Error types and classification for quote resolution.
//!
//! This module provides:
//! - [`QuoteError`]: The error enum returned by every fallible operation
//! - [`ErrorKind`]: The provider-agnostic taxonomy callers branch on
//! - [`Guidance`]: What the end user should be told to do next

mod guidance;

pub use guidance::Guidance;

use thiserror::Error;

/// Errors that can occur while resolving quotes, history or overviews.
///
/// Each variant projects onto the [`ErrorKind`] taxonomy via [`kind`](Self::kind)
/// and onto user guidance via [`guidance`](Self::guidance).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// The input was rejected before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The provider could not be reached, or did not answer in time.
    #[error("Network error: {provider} - {message}")]
    Network {
        provider: String,
        message: String,
        /// True when the request hit the client timeout.
        timed_out: bool,
    },

    /// A transport-level failure other than connect/timeout
    /// (non-success status, body read failure, redirect loop).
    #[error("Transport error: {provider} - {message}")]
    Transport { provider: String, message: String },

    /// Malformed JSON or an unparseable field.
    #[error("Parse error: {provider} - {message}")]
    Parse { provider: String, message: String },

    /// The provider rejected the symbol.
    #[error("Invalid symbol '{symbol}' ({provider})")]
    InvalidSymbol { provider: String, symbol: String },

    /// The provider's call quota was exhausted.
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// An explicit provider error envelope, or a response of unexpected shape.
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    /// The provider answered with an empty body.
    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },

    /// The selected provider does not offer this operation.
    #[error("{provider} does not support {operation}")]
    Unsupported { provider: String, operation: String },

    /// A well-formed response that carries no data for the symbol.
    #[error("No data found for symbol: {0}")]
    NotFound(String),
}

/// Provider-agnostic error taxonomy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Network,
    Transport,
    Parse,
    Provider(ProviderErrorKind),
    NotFound,
}

/// Refinement of [`ErrorKind::Provider`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProviderErrorKind {
    InvalidSymbol,
    RateLimited,
    Other,
}

impl QuoteError {
    pub(crate) fn network(provider: &str, message: impl Into<String>, timed_out: bool) -> Self {
        Self::Network {
            provider: provider.to_string(),
            message: message.into(),
            timed_out,
        }
    }

    pub(crate) fn transport(provider: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rate_limited(provider: &str) -> Self {
        Self::RateLimited {
            provider: provider.to_string(),
        }
    }

    /// Returns the taxonomy member for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickerview_quotes::errors::{ErrorKind, ProviderErrorKind, QuoteError};
    ///
    /// let error = QuoteError::RateLimited { provider: "ALPHA_VANTAGE".to_string() };
    /// assert_eq!(error.kind(), ErrorKind::Provider(ProviderErrorKind::RateLimited));
    ///
    /// let error = QuoteError::NotFound("ZZZZ".to_string());
    /// assert_eq!(error.kind(), ErrorKind::NotFound);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidSymbol { .. } => ErrorKind::Provider(ProviderErrorKind::InvalidSymbol),
            Self::RateLimited { .. } => ErrorKind::Provider(ProviderErrorKind::RateLimited),
            Self::Provider { .. } | Self::EmptyResponse { .. } | Self::Unsupported { .. } => {
                ErrorKind::Provider(ProviderErrorKind::Other)
            }
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Returns what the end user should be told to do about this error.
    pub fn guidance(&self) -> Guidance {
        match self {
            Self::Validation(_) => Guidance::FixInput,
            Self::Network {
                timed_out: true, ..
            } => Guidance::RetryLater,
            Self::Network { .. } => Guidance::CheckConnection,
            Self::Transport { .. } | Self::Parse { .. } => Guidance::RetryLater,
            Self::InvalidSymbol { .. } | Self::NotFound(_) => Guidance::CheckSpelling,
            Self::RateLimited { .. }
            | Self::Provider { .. }
            | Self::EmptyResponse { .. }
            | Self::Unsupported { .. } => Guidance::UseDemoMode,
        }
    }

    /// Whether a failed live quote may be answered from the demo provider.
    ///
    /// Only quota, credential and payload failures qualify. Bad symbols and
    /// network failures are surfaced as-is.
    pub fn allows_demo_fallback(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Provider { .. }
                | Self::EmptyResponse { .. }
                | Self::Parse { .. }
        )
    }

    /// Whether an overview failure should be hidden from the user.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
