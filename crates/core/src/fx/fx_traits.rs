use super::fx_model::RateQuote;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Resolves the historical USD to EUR rate for a ledger date.
#[async_trait]
pub trait RateLookupTrait: Send + Sync {
    async fn rate_for(&self, date: NaiveDate) -> Result<RateQuote>;
}
