/// Request context for a lookup.
///
/// Carries per-request options explicitly instead of reading them from
/// shared state.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// Skip cached results and replace them with a fresh live answer.
    pub force_refresh: bool,
}

impl RequestContext {
    /// Context that bypasses the response cache.
    pub fn refresh() -> Self {
        Self {
            force_refresh: true,
        }
    }
}
