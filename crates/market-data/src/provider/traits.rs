//! Exchange rate provider trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::ReferenceRate;

/// Trait for sources of daily reference exchange rates.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use cgt_market_data::provider::ExchangeRateProvider;
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl ExchangeRateProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_reference_rate(&self, base: &str, quote: &str, date: NaiveDate)
///         -> Result<Option<ReferenceRate>, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Unique identifier for this provider, used for logging and error context.
    fn id(&self) -> &'static str;

    /// Fetch the reference rate published for `date`.
    ///
    /// Returns `Ok(None)` when the provider has no publication for that exact
    /// day (non-trading day). Providers that silently answer with an earlier
    /// publication must report that day as the `effective_date`.
    async fn fetch_reference_rate(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Option<ReferenceRate>, MarketDataError>;
}
