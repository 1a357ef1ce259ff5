use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// EUR per 1 USD as published for `effective_date`.
///
/// `effective_date` differs from `requested_date` when the requested day had
/// no publication (weekend, holiday) and an earlier day was used instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    pub effective_date: NaiveDate,
    pub requested_date: NaiveDate,
}

impl RateQuote {
    pub fn is_fallback(&self) -> bool {
        self.effective_date != self.requested_date
    }
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(6);
    serializer.serialize_str(&rounded.to_string())
}
