use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::errors::{MarketDataError, RetryClass};
use crate::models::ReferenceRate;
use crate::provider::ExchangeRateProvider;

/// Tuning knobs for [`HistoricalRateResolver`].
#[derive(Debug, Clone, Copy)]
pub struct ResolverSettings {
    /// Number of calendar days (requested day included) to try before giving up.
    pub max_lookback_days: u32,
    /// Attempts per day for transient failures.
    pub max_attempts: u32,
    /// Pause between transient-failure attempts.
    pub retry_delay: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_lookback_days: 5,
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Finds the reference rate that applies to a date.
///
/// Rates are only published on trading days. For a weekend or bank holiday
/// the resolver steps back one calendar day at a time until the provider
/// answers, so the caller always receives the most recent prior publication
/// together with its effective date.
#[derive(Clone)]
pub struct HistoricalRateResolver {
    provider: Arc<dyn ExchangeRateProvider>,
    settings: ResolverSettings,
}

impl HistoricalRateResolver {
    pub fn new(provider: Arc<dyn ExchangeRateProvider>) -> Self {
        Self::with_settings(provider, ResolverSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn ExchangeRateProvider>, settings: ResolverSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> ResolverSettings {
        self.settings
    }

    /// Resolve the `base`→`quote` rate applicable on `date`.
    pub async fn resolve(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<ReferenceRate, MarketDataError> {
        let mut candidate = date;

        for _ in 0..self.settings.max_lookback_days {
            if let Some(mut rate) = self.fetch_with_retry(base, quote, candidate).await? {
                rate.requested_date = date;
                if rate.is_fallback() {
                    warn!(
                        "No {}/{} rate for {}. Using rate from {}: {}",
                        base, quote, date, rate.effective_date, rate.rate
                    );
                }
                return Ok(rate);
            }

            debug!("No {}/{} publication on {}, stepping back", base, quote, candidate);
            candidate = match candidate.pred_opt() {
                Some(previous) => previous,
                None => break,
            };
        }

        Err(MarketDataError::RateNotFound {
            base: base.to_string(),
            quote: quote.to_string(),
            date,
            lookback_days: self.settings.max_lookback_days,
        })
    }

    async fn fetch_with_retry(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Option<ReferenceRate>, MarketDataError> {
        let mut attempt = 1;
        loop {
            match self.provider.fetch_reference_rate(base, quote, date).await {
                Ok(rate) => return Ok(rate),
                Err(err) => match err.retry_class() {
                    RetryClass::PreviousDay => return Ok(None),
                    RetryClass::WithBackoff if attempt < self.settings.max_attempts => {
                        warn!(
                            "{} attempt {}/{} for {} failed: {}",
                            self.provider.id(),
                            attempt,
                            self.settings.max_attempts,
                            date,
                            err
                        );
                        tokio::time::sleep(self.settings.retry_delay).await;
                        attempt += 1;
                    }
                    _ => return Err(err),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Scripted = Result<Option<ReferenceRate>, MarketDataError>;

    /// Provider that replays scripted answers and records requested dates.
    struct ScriptedProvider {
        answers: Mutex<VecDeque<Scripted>>,
        requested: Mutex<Vec<NaiveDate>>,
    }

    impl ScriptedProvider {
        fn new(answers: Vec<Scripted>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<NaiveDate> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExchangeRateProvider for ScriptedProvider {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        async fn fetch_reference_rate(
            &self,
            _base: &str,
            _quote: &str,
            date: NaiveDate,
        ) -> Result<Option<ReferenceRate>, MarketDataError> {
            self.requested.lock().unwrap().push(date);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn published(date: NaiveDate, rate: rust_decimal::Decimal) -> Scripted {
        Ok(Some(ReferenceRate {
            base: "USD".to_string(),
            quote: "EUR".to_string(),
            rate,
            effective_date: date,
            requested_date: date,
            source: "SCRIPTED".to_string(),
        }))
    }

    fn fast_settings() -> ResolverSettings {
        ResolverSettings {
            retry_delay: Duration::from_millis(1),
            ..ResolverSettings::default()
        }
    }

    #[tokio::test]
    async fn test_trading_day_resolves_directly() {
        let provider = Arc::new(ScriptedProvider::new(vec![published(day(2023, 6, 9), dec!(0.9299))]));
        let resolver = HistoricalRateResolver::with_settings(provider.clone(), fast_settings());

        let rate = resolver.resolve("USD", "EUR", day(2023, 6, 9)).await.unwrap();

        assert_eq!(rate.rate, dec!(0.9299));
        assert_eq!(rate.effective_date, day(2023, 6, 9));
        assert!(!rate.is_fallback());
        assert_eq!(provider.requested(), vec![day(2023, 6, 9)]);
    }

    #[tokio::test]
    async fn test_sunday_falls_back_to_friday() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(None),
            Err(MarketDataError::NoDataForDate(day(2023, 6, 10))),
            published(day(2023, 6, 9), dec!(0.9299)),
        ]));
        let resolver = HistoricalRateResolver::with_settings(provider.clone(), fast_settings());

        let rate = resolver.resolve("USD", "EUR", day(2023, 6, 11)).await.unwrap();

        assert_eq!(rate.effective_date, day(2023, 6, 9));
        assert_eq!(rate.requested_date, day(2023, 6, 11));
        assert!(rate.is_fallback());
        assert_eq!(
            provider.requested(),
            vec![day(2023, 6, 11), day(2023, 6, 10), day(2023, 6, 9)]
        );
    }

    #[tokio::test]
    async fn test_transient_failure_retries_same_day() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(MarketDataError::Timeout {
                provider: "SCRIPTED".to_string(),
            }),
            published(day(2023, 1, 10), dec!(0.93)),
        ]));
        let resolver = HistoricalRateResolver::with_settings(provider.clone(), fast_settings());

        let rate = resolver.resolve("USD", "EUR", day(2023, 1, 10)).await.unwrap();

        assert_eq!(rate.rate, dec!(0.93));
        assert_eq!(provider.requested(), vec![day(2023, 1, 10), day(2023, 1, 10)]);
    }

    #[tokio::test]
    async fn test_transient_failures_give_up_after_max_attempts() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(MarketDataError::RateLimited {
                provider: "SCRIPTED".to_string(),
            }),
            Err(MarketDataError::RateLimited {
                provider: "SCRIPTED".to_string(),
            }),
            Err(MarketDataError::RateLimited {
                provider: "SCRIPTED".to_string(),
            }),
        ]));
        let resolver = HistoricalRateResolver::with_settings(provider.clone(), fast_settings());

        let err = resolver.resolve("USD", "EUR", day(2023, 1, 10)).await.unwrap_err();

        assert!(matches!(err, MarketDataError::RateLimited { .. }));
        assert_eq!(provider.requested().len(), 3);
    }

    #[tokio::test]
    async fn test_terminal_provider_error_aborts_without_stepping_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(MarketDataError::ProviderError {
            provider: "SCRIPTED".to_string(),
            message: "HTTP error: 500".to_string(),
        })]));
        let resolver = HistoricalRateResolver::with_settings(provider.clone(), fast_settings());

        let err = resolver.resolve("USD", "EUR", day(2023, 1, 10)).await.unwrap_err();

        assert!(matches!(err, MarketDataError::ProviderError { .. }));
        assert_eq!(provider.requested(), vec![day(2023, 1, 10)]);
    }

    #[tokio::test]
    async fn test_lookback_window_exhausted() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let resolver = HistoricalRateResolver::with_settings(provider.clone(), fast_settings());

        let err = resolver.resolve("USD", "EUR", day(2023, 12, 26)).await.unwrap_err();

        assert!(matches!(
            err,
            MarketDataError::RateNotFound { lookback_days: 5, .. }
        ));
        assert_eq!(provider.requested().len(), 5);
        assert_eq!(provider.requested().last().copied(), Some(day(2023, 12, 22)));
    }
}
