//! Frankfurter provider for ECB reference rates.
//!
//! Frankfurter publishes the European Central Bank's daily reference rates.
//! Historical lookups use `GET /{YYYY-MM-DD}?from=USD&to=EUR`; the response
//! carries the publication date that actually answered the request.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::ReferenceRate;
use crate::provider::ExchangeRateProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "FRANKFURTER";

/// Public Frankfurter instance.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Decimal places kept from the published rate.
const RATE_SCALE: u32 = 6;

/// API response from Frankfurter
#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    #[allow(dead_code)]
    amount: f64,
    base: String,
    date: String,
    rates: HashMap<String, f64>,
}

/// Frankfurter reference rate provider.
///
/// # Example
///
/// ```ignore
/// use cgt_market_data::FrankfurterProvider;
///
/// let provider = FrankfurterProvider::new("https://api.frankfurter.app");
/// ```
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, base: &str, quote: &str, date: NaiveDate) -> String {
        format!(
            "{}/{}?from={}&to={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            base,
            quote
        )
    }

    /// Parse a Frankfurter JSON body into a reference rate.
    ///
    /// Returns `Ok(None)` when the quote currency is absent from `rates`.
    fn parse_response(
        body: &str,
        quote: &str,
        requested_date: NaiveDate,
    ) -> Result<Option<ReferenceRate>, MarketDataError> {
        let response: FrankfurterResponse =
            serde_json::from_str(body).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to decode JSON: {}", e),
            })?;

        let Some(raw_rate) = response.rates.get(quote).copied() else {
            return Ok(None);
        };

        let rate = Decimal::from_f64(raw_rate)
            .map(|r| r.round_dp(RATE_SCALE))
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Rate {} is not representable", raw_rate),
            })?;
        if rate <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Rate {} for {}/{} is not positive", rate, response.base, quote),
            });
        }

        let effective_date = NaiveDate::parse_from_str(&response.date, "%Y-%m-%d").map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Invalid date '{}': {}", response.date, e),
            }
        })?;

        Ok(Some(ReferenceRate {
            base: response.base,
            quote: quote.to_string(),
            rate,
            effective_date,
            requested_date,
            source: PROVIDER_ID.to_string(),
        }))
    }
}

#[async_trait]
impl ExchangeRateProvider for FrankfurterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_reference_rate(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Option<ReferenceRate>, MarketDataError> {
        let url = self.url_for(base, quote, date);
        debug!("Fetching reference rate from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", status),
            });
        }

        let body = response.text().await?;
        Self::parse_response(&body, quote, date)
    }
}
