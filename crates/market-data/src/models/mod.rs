//! Data models for reference rates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A daily reference exchange rate as published by a provider.
///
/// `rate` is the amount of `quote` currency for one unit of `base`
/// (e.g. EUR per 1 USD). `effective_date` is the publication date, which
/// can be earlier than `requested_date` when the requested day had no
/// publication (weekend, bank holiday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRate {
    pub base: String,
    pub quote: String,
    pub rate: Decimal,
    pub effective_date: NaiveDate,
    pub requested_date: NaiveDate,
    pub source: String,
}

impl ReferenceRate {
    /// True when the rate was published for a different day than requested.
    pub fn is_fallback(&self) -> bool {
        self.effective_date != self.requested_date
    }
}
