//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all rate lookups
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while looking up reference rates.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the resolver should handle the error.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No published rate was found within the lookback window.
    #[error("No {base}/{quote} reference rate found for {date} within {lookback_days} days")]
    RateNotFound {
        base: String,
        quote: String,
        date: NaiveDate,
        lookback_days: u32,
    },

    /// The provider has no publication for this exact date.
    #[error("No data for date {0}")]
    NoDataForDate(NaiveDate),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A provider-specific error occurred (unexpected status, bad payload).
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider returned a rate that failed validation.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cgt_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "FRANKFURTER".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateNotFound { .. }
            | Self::ProviderError { .. }
            | Self::ValidationFailed { .. } => RetryClass::Never,

            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => {
                RetryClass::WithBackoff
            }

            Self::NoDataForDate(_) => RetryClass::PreviousDay,
        }
    }
}
