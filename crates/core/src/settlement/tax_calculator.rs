use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{CGT_RATE, MINOR_UNITS_PER_MAJOR};
use crate::errors::{Result, ValidationError};
use crate::ledger::{AcquisitionLot, DisposalEvent};

/// Exact figures for one matched chunk, before any EUR rounding.
///
/// EUR amounts are in euros with full precision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkComputation {
    pub shares: i64,
    pub gross_proceeds_usd_cents: i64,
    pub cost_basis_usd_cents: i64,
    pub gain_usd_cents: i64,
    pub acquisition_cost_eur: Decimal,
    pub disposal_value_eur: Decimal,
    pub gain_eur: Decimal,
    pub tax_due_eur: Decimal,
    pub net_proceeds_eur: Decimal,
}

/// Prices `shares` of `lot` sold in `disposal`.
///
/// The acquisition leg is converted at the lot's own rate and the disposal leg
/// at the disposal's rate. A loss yields a negative tax figure.
pub fn compute_chunk(
    disposal: &DisposalEvent,
    lot: &AcquisitionLot,
    shares: i64,
) -> Result<ChunkComputation> {
    if shares <= 0 {
        return Err(ValidationError::non_positive("shares", shares).into());
    }
    disposal.validate()?;
    lot.validate()?;

    let gross_proceeds_usd_cents = checked_amount(disposal.unit_price_cents, shares, &disposal.id)?;
    let cost_basis_usd_cents = checked_amount(lot.unit_price_cents, shares, &lot.id)?;
    let gain_usd_cents = gross_proceeds_usd_cents - cost_basis_usd_cents;

    let acquisition_cost_eur = Decimal::new(cost_basis_usd_cents, 2) * lot.rate;
    let disposal_value_eur = Decimal::new(gross_proceeds_usd_cents, 2) * disposal.rate;
    let gain_eur = disposal_value_eur - acquisition_cost_eur;
    let tax_due_eur = gain_eur * CGT_RATE;
    let net_proceeds_eur = disposal_value_eur - tax_due_eur;

    Ok(ChunkComputation {
        shares,
        gross_proceeds_usd_cents,
        cost_basis_usd_cents,
        gain_usd_cents,
        acquisition_cost_eur,
        disposal_value_eur,
        gain_eur,
        tax_due_eur,
        net_proceeds_eur,
    })
}

/// Converts a currency amount to minor units, rounding half to even.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| {
            ValidationError::InvalidInput(format!("amount {} does not fit in cents", amount)).into()
        })
}

fn checked_amount(unit_price_cents: i64, shares: i64, owner: &str) -> Result<i64> {
    unit_price_cents.checked_mul(shares).ok_or_else(|| {
        ValidationError::InvalidInput(format!(
            "{} shares at {} cents on '{}' overflows",
            shares, unit_price_cents, owner
        ))
        .into()
    })
}
