use rust_decimal::Decimal;
use uuid::Uuid;

use super::fifo_matcher::match_fifo;
use super::inventory::resolve_inventory;
use super::settlement_errors::SettlementError;
use super::settlement_model::SettlementResult;
use super::tax_calculator::compute_chunk;
use crate::errors::Result;
use crate::ledger::{Allocation, LedgerTransaction};

/// Settles one disposal against the open inventory.
///
/// Runs entirely through `tx`; any error leaves the transaction to be rolled
/// back by its owner. Every chunk is priced before the first write so a
/// calculation failure never follows a partial insert.
pub fn settle_disposal(
    tx: &mut dyn LedgerTransaction,
    disposal_id: &str,
) -> Result<Vec<SettlementResult>> {
    let disposal = tx.get_disposal(disposal_id)?;
    if disposal.is_settled {
        return Err(SettlementError::AlreadySettled {
            disposal_id: disposal.id,
        }
        .into());
    }
    disposal.validate()?;

    let mut inventory = resolve_inventory(tx.load_lot_consumption()?);
    let outcome = match_fifo(disposal.quantity, &mut inventory);
    if !outcome.is_complete() {
        log::warn!(
            "Cannot settle disposal {}: {} of {} shares unmatched",
            disposal.id,
            outcome.unmatched,
            disposal.quantity
        );
        return Err(SettlementError::InsufficientInventory {
            disposal_id: disposal.id,
            short_by: outcome.unmatched,
        }
        .into());
    }

    let mut results = Vec::with_capacity(outcome.matches.len());
    for (index, lot_match) in outcome.matches.iter().enumerate() {
        let chunk = compute_chunk(&disposal, &lot_match.lot, lot_match.quantity)?;
        let chunk_index = i32::try_from(index).map_err(|_| {
            crate::Error::Unexpected(format!("disposal {} has too many chunks", disposal.id))
        })?;
        results.push(SettlementResult::from_chunk(
            Uuid::new_v4().to_string(),
            &disposal,
            &lot_match.lot,
            chunk_index,
            &chunk,
        )?);
    }

    for (lot_match, result) in outcome.matches.iter().zip(&results) {
        tx.insert_allocation(&Allocation {
            disposal_id: disposal.id.clone(),
            acquisition_id: lot_match.lot.id.clone(),
            quantity: lot_match.quantity,
        })?;
        tx.insert_settlement_result(result)?;
        log::debug!(
            "Disposal {} chunk {}: {} shares from lot {} ({}), gain {} EUR cents",
            disposal.id,
            result.chunk_index,
            result.shares,
            lot_match.lot.id,
            lot_match.lot.date,
            result.gain_eur_cents
        );
    }

    tx.mark_disposal_settled(&disposal.id)?;

    // Totals can exceed i64 cents even when every chunk fits.
    let total = |cents: fn(&SettlementResult) -> i64| {
        results
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc + Decimal::new(cents(r), 2))
    };
    log::info!(
        "Settled disposal {} ({} shares, {} lots): disposal value {} EUR, cost basis {} EUR, chargeable gain {} EUR",
        disposal.id,
        disposal.quantity,
        results.len(),
        total(|r| r.proceeds_eur_cents),
        total(|r| r.cost_basis_eur_cents),
        total(|r| r.gain_eur_cents)
    );

    Ok(results)
}
