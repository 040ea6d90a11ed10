/// User-facing follow-up for a failed lookup.
///
/// Chosen from the error taxonomy so the presentation layer never has to
/// pattern-match on message text.
///
/// | Guidance | Raised for |
/// |----------|------------|
/// | `FixInput` | `Validation` |
/// | `CheckConnection` | `Network` (connect failure) |
/// | `RetryLater` | `Network` (timeout), `Transport`, `Parse` |
/// | `CheckSpelling` | `InvalidSymbol`, `NotFound` |
/// | `UseDemoMode` | `RateLimited` and other provider errors |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Guidance {
    /// The symbol itself is malformed.
    FixInput,

    /// The provider could not be reached at all.
    CheckConnection,

    /// The provider answered badly or slowly; a later attempt may succeed.
    RetryLater,

    /// The provider does not know the symbol.
    CheckSpelling,

    /// The live provider refused to serve (quota or credential).
    /// Demo data is the only thing that can be shown right now.
    UseDemoMode,
}
