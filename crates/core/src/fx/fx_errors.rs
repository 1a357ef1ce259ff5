use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("No exchange rate available for {0}")]
    RateNotFound(NaiveDate),

    #[error("Invalid exchange rate {rate} for {date}")]
    InvalidRate { rate: String, date: NaiveDate },

    #[error("Rate cache error: {0}")]
    CacheError(String),
}
