use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A vest: shares received on `date` at the USD market price per share.
///
/// `rate` is the EUR per USD reference rate that applied on `date`, published
/// for `rate_date` (earlier than `date` on weekends and holidays). Lots are
/// immutable once recorded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionLot {
    pub id: String,
    pub date: NaiveDate,
    pub symbol: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
}

impl AcquisitionLot {
    /// Checks the invariants a lot must hold before it can feed a settlement.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("quantity", self.quantity)?;
        ensure_positive("unitPriceCents", self.unit_price_cents)?;
        ensure_positive_rate(self.rate, &self.id)
    }
}

/// Input for recording a vest. The rate is resolved by the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAcquisition {
    pub date: NaiveDate,
    pub symbol: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl NewAcquisition {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }
        ensure_positive("quantity", self.quantity)?;
        ensure_positive("unitPriceCents", self.unit_price_cents)
    }

    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }
}

/// A sale of shares on `date` at the USD price per share.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisposalEvent {
    pub id: String,
    pub date: NaiveDate,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
    pub is_settled: bool,
}

impl DisposalEvent {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("quantity", self.quantity)?;
        ensure_positive("unitPriceCents", self.unit_price_cents)?;
        ensure_positive_rate(self.rate, &self.id)
    }
}

/// Input for recording a sale. The rate is resolved by the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewDisposal {
    pub date: NaiveDate,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl NewDisposal {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("quantity", self.quantity)?;
        ensure_positive("unitPriceCents", self.unit_price_cents)
    }
}

/// Shares of one acquisition lot consumed by one disposal.
///
/// At most one allocation exists per (disposal, acquisition) pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub disposal_id: String,
    pub acquisition_id: String,
    pub quantity: i64,
}

/// A lot together with the total quantity already allocated against it.
#[derive(Debug, Clone, PartialEq)]
pub struct LotConsumption {
    pub lot: AcquisitionLot,
    pub consumed_quantity: i64,
}

fn ensure_positive(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(ValidationError::non_positive(field, value).into());
    }
    Ok(())
}

fn ensure_positive_rate(rate: Decimal, owner: &str) -> Result<()> {
    if rate <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "exchange rate {} on '{}' must be positive",
            rate, owner
        ))
        .into());
    }
    Ok(())
}
