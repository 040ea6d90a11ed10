//! Provider capabilities and published rate limits.
//!
//! The resolver checks capabilities before calling a provider. An operation
//! the provider does not offer is never sent to it, and a dashboard lookup
//! leaves it out without a warning.

/// Describes what a quote provider can do.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Whether the provider supports historical series fetching.
    pub supports_history: bool,

    /// Whether the provider supports company overviews.
    pub supports_overview: bool,
}

/// Call quota published by a provider.
///
/// Informational only: calls are never throttled or retried, but the limit
/// is shown to users when a rate limit is hit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum requests allowed per minute, if the provider publishes one.
    pub requests_per_minute: Option<u32>,

    /// Maximum requests allowed per day, if the provider publishes one.
    pub requests_per_day: Option<u32>,
}

impl RateLimit {
    /// No published limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Short description, e.g. "5 calls per minute, 25 calls per day".
    pub fn describe(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.requests_per_minute.map(|n| format!("{} calls per minute", n)),
            self.requests_per_day.map(|n| format!("{} calls per day", n)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
