use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax_calculator::{to_minor_units, ChunkComputation};
use crate::constants::{CGT_RATE, SETTLEMENT_COMPLETED, SETTLEMENT_METHOD_FIFO};
use crate::errors::Result;
use crate::ledger::{AcquisitionLot, DisposalEvent};

/// Tax breakdown for one matched chunk of a disposal.
///
/// USD amounts are cents, EUR amounts are euro cents. For every row
/// `proceeds_eur_cents - cost_basis_eur_cents == gain_eur_cents` and
/// `net_proceeds_eur_cents + tax_due_eur_cents == proceeds_eur_cents`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub id: String,
    pub disposal_id: String,
    pub acquisition_id: String,
    /// Position of the chunk within its disposal, in FIFO order.
    pub chunk_index: i32,
    pub disposal_date: NaiveDate,
    pub symbol: String,
    pub shares: i64,
    pub sale_proceeds_usd_cents: i64,
    pub gain_usd_cents: i64,
    pub cost_basis_usd_cents: i64,
    pub acquisition_rate: Decimal,
    pub gross_proceeds_usd_cents: i64,
    pub acquisition_value_usd_cents: i64,
    pub disposal_rate: Decimal,
    pub cost_basis_eur_cents: i64,
    pub proceeds_eur_cents: i64,
    pub gain_eur_cents: i64,
    pub tax_due_eur_cents: i64,
    pub net_proceeds_eur_cents: i64,
    pub completed: String,
    pub method: String,
}

impl SettlementResult {
    /// Rounds an exact chunk computation into the stored row.
    ///
    /// Both EUR legs are rounded to cents first; gain, tax and net are then
    /// derived from the rounded legs so the row always balances.
    pub fn from_chunk(
        id: String,
        disposal: &DisposalEvent,
        lot: &AcquisitionLot,
        chunk_index: i32,
        chunk: &ChunkComputation,
    ) -> Result<Self> {
        let cost_basis_eur_cents = to_minor_units(chunk.acquisition_cost_eur)?;
        let proceeds_eur_cents = to_minor_units(chunk.disposal_value_eur)?;
        let gain_eur_cents = proceeds_eur_cents - cost_basis_eur_cents;
        let tax_due_eur_cents = to_minor_units(Decimal::new(gain_eur_cents, 2) * CGT_RATE)?;
        let net_proceeds_eur_cents = proceeds_eur_cents - tax_due_eur_cents;

        Ok(SettlementResult {
            id,
            disposal_id: disposal.id.clone(),
            acquisition_id: lot.id.clone(),
            chunk_index,
            disposal_date: disposal.date,
            symbol: lot.symbol.clone(),
            shares: chunk.shares,
            sale_proceeds_usd_cents: chunk.gross_proceeds_usd_cents,
            gain_usd_cents: chunk.gain_usd_cents,
            cost_basis_usd_cents: chunk.cost_basis_usd_cents,
            acquisition_rate: lot.rate,
            gross_proceeds_usd_cents: chunk.gross_proceeds_usd_cents,
            acquisition_value_usd_cents: chunk.cost_basis_usd_cents,
            disposal_rate: disposal.rate,
            cost_basis_eur_cents,
            proceeds_eur_cents,
            gain_eur_cents,
            tax_due_eur_cents,
            net_proceeds_eur_cents,
            completed: SETTLEMENT_COMPLETED.to_string(),
            method: SETTLEMENT_METHOD_FIFO.to_string(),
        })
    }
}
