use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use uuid::Uuid;

use super::ledger_model::{AcquisitionLot, DisposalEvent, NewAcquisition, NewDisposal};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait, LedgerTransaction};
use crate::errors::Result;
use crate::fx::RateLookupTrait;
use crate::importer::{parse_sale_report, parse_vest_report};
use crate::settlement::{resolve_inventory, settle_disposal, InventoryItem, SettlementResult};

/// Service for recording ledger events and settling disposals.
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    rate_lookup: Arc<dyn RateLookupTrait>,
}

impl LedgerService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        rate_lookup: Arc<dyn RateLookupTrait>,
    ) -> Self {
        Self {
            repository,
            rate_lookup,
        }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn record_acquisition(&self, acquisition: NewAcquisition) -> Result<AcquisitionLot> {
        acquisition.validate()?;
        let quote = self.rate_lookup.rate_for(acquisition.date).await?;

        let lot = AcquisitionLot {
            id: Uuid::new_v4().to_string(),
            date: acquisition.date,
            symbol: acquisition.normalized_symbol(),
            quantity: acquisition.quantity,
            unit_price_cents: acquisition.unit_price_cents,
            rate: quote.rate,
            rate_date: quote.effective_date,
        };
        let lot = self.repository.insert_acquisition(lot).await?;

        info!(
            "Recorded vest {}: {} {} on {} at rate {} ({})",
            lot.id, lot.quantity, lot.symbol, lot.date, lot.rate, lot.rate_date
        );
        Ok(lot)
    }

    async fn record_disposal(&self, disposal: NewDisposal) -> Result<DisposalEvent> {
        disposal.validate()?;
        let quote = self.rate_lookup.rate_for(disposal.date).await?;

        let event = DisposalEvent {
            id: Uuid::new_v4().to_string(),
            date: disposal.date,
            quantity: disposal.quantity,
            unit_price_cents: disposal.unit_price_cents,
            rate: quote.rate,
            rate_date: quote.effective_date,
            is_settled: false,
        };
        let event = self.repository.insert_disposal(event).await?;

        info!(
            "Recorded sale {}: {} shares on {} at rate {} ({})",
            event.id, event.quantity, event.date, event.rate, event.rate_date
        );
        Ok(event)
    }

    async fn settle(&self, disposal_id: &str) -> Result<Vec<SettlementResult>> {
        let disposal_id = disposal_id.to_string();
        debug!("Settling disposal {}", disposal_id);
        self.repository
            .run_settlement(Box::new(move |tx: &mut dyn LedgerTransaction| {
                settle_disposal(tx, &disposal_id)
            }))
            .await
    }

    fn current_inventory(&self) -> Result<Vec<InventoryItem>> {
        Ok(resolve_inventory(self.repository.load_lot_consumption()?))
    }

    fn settlement_history(&self) -> Result<Vec<SettlementResult>> {
        self.repository.list_settlement_results()
    }

    fn get_acquisitions(&self) -> Result<Vec<AcquisitionLot>> {
        self.repository.list_acquisitions()
    }

    fn get_disposals(&self) -> Result<Vec<DisposalEvent>> {
        self.repository.list_disposals()
    }

    fn get_disposal(&self, disposal_id: &str) -> Result<DisposalEvent> {
        self.repository.get_disposal(disposal_id)
    }

    async fn import_acquisitions(
        &self,
        content: &[u8],
        symbol: &str,
    ) -> Result<Vec<AcquisitionLot>> {
        let rows = parse_vest_report(content, symbol)?;
        for row in &rows {
            row.validate()?;
        }

        let mut recorded = Vec::with_capacity(rows.len());
        for row in rows {
            recorded.push(self.record_acquisition(row).await?);
        }
        info!("Imported {} vests", recorded.len());
        Ok(recorded)
    }

    async fn import_disposals(&self, content: &[u8]) -> Result<Vec<DisposalEvent>> {
        let rows = parse_sale_report(content)?;
        for row in &rows {
            row.validate()?;
        }

        let mut recorded = Vec::with_capacity(rows.len());
        for row in rows {
            recorded.push(self.record_disposal(row).await?);
        }
        info!("Imported {} sales", recorded.len());
        Ok(recorded)
    }
}
