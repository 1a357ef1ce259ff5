/// Classification for retry policy.
///
/// Used by the [`HistoricalRateResolver`](crate::HistoricalRateResolver) to
/// decide what to do after a provider call fails.
///
/// | Class | Retry same day? | Step back a day? |
/// |-------|-----------------|------------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, after a pause | No |
/// | `PreviousDay` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - invalid request, bad payload or terminal failure.
    Never,

    /// Transient failure (network, timeout, rate limit). Retry the same
    /// date after a short pause.
    WithBackoff,

    /// The provider has nothing for this date but an earlier date may
    /// have a publication.
    PreviousDay,
}
