//! Resolution of a requested date to a published reference rate.

mod historical_rate_resolver;

pub use historical_rate_resolver::{HistoricalRateResolver, ResolverSettings};
