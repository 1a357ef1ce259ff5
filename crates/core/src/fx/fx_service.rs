use super::fx_errors::FxError;
use super::fx_model::RateQuote;
use super::fx_traits::RateLookupTrait;
use crate::constants::{BASE_CURRENCY, REPORTING_CURRENCY};
use crate::errors::Result;
use async_trait::async_trait;
use cgt_market_data::{HistoricalRateResolver, MarketDataError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Rate lookup backed by the market data resolver with an in-process cache.
///
/// Published reference rates never change, so a resolved date is cached for
/// the lifetime of the service.
#[derive(Clone)]
pub struct FxService {
    resolver: Arc<HistoricalRateResolver>,
    cache: Arc<RwLock<HashMap<NaiveDate, RateQuote>>>,
}

impl FxService {
    pub fn new(resolver: Arc<HistoricalRateResolver>) -> Self {
        Self {
            resolver,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn cached(&self, date: NaiveDate) -> Result<Option<RateQuote>> {
        let cache = self
            .cache
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        Ok(cache.get(&date).cloned())
    }

    fn remember(&self, quote: &RateQuote) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        cache.insert(quote.requested_date, quote.clone());
        Ok(())
    }
}

#[async_trait]
impl RateLookupTrait for FxService {
    async fn rate_for(&self, date: NaiveDate) -> Result<RateQuote> {
        if let Some(quote) = self.cached(date)? {
            return Ok(quote);
        }

        let reference = self
            .resolver
            .resolve(BASE_CURRENCY, REPORTING_CURRENCY, date)
            .await
            .map_err(|e| match e {
                MarketDataError::RateNotFound { date, .. } => {
                    crate::Error::from(FxError::RateNotFound(date))
                }
                other => crate::Error::from(other),
            })?;

        if reference.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                rate: reference.rate.to_string(),
                date: reference.effective_date,
            }
            .into());
        }

        let quote = RateQuote {
            rate: reference.rate,
            effective_date: reference.effective_date,
            requested_date: date,
        };
        if quote.is_fallback() {
            log::debug!(
                "Using {} rate {} for {}",
                quote.effective_date,
                quote.rate,
                date
            );
        }
        self.remember(&quote)?;
        Ok(quote)
    }
}
