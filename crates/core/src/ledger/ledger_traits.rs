use async_trait::async_trait;

use super::ledger_model::{
    AcquisitionLot, Allocation, DisposalEvent, LotConsumption, NewAcquisition, NewDisposal,
};
use crate::errors::Result;
use crate::settlement::{InventoryItem, SettlementResult};

/// Transactional view of the ledger used while settling one disposal.
///
/// Every call made through one instance belongs to the same transaction: it is
/// committed only when the enclosing [`SettlementJob`] returns `Ok`, and rolled
/// back otherwise. Implementations serialize transactions, so the lot
/// consumption read here cannot change until the job finishes.
pub trait LedgerTransaction {
    fn get_disposal(&mut self, disposal_id: &str) -> Result<DisposalEvent>;

    /// All lots with their consumed quantity, in any order.
    fn load_lot_consumption(&mut self) -> Result<Vec<LotConsumption>>;

    fn insert_allocation(&mut self, allocation: &Allocation) -> Result<()>;

    fn insert_settlement_result(&mut self, result: &SettlementResult) -> Result<()>;

    /// Flags the disposal settled. Fails with `AlreadySettled` when another
    /// settlement got there first.
    fn mark_disposal_settled(&mut self, disposal_id: &str) -> Result<()>;
}

/// Unit of work run inside a single ledger transaction.
pub type SettlementJob =
    Box<dyn FnOnce(&mut dyn LedgerTransaction) -> Result<Vec<SettlementResult>> + Send + 'static>;

/// Trait defining the contract for ledger persistence.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    async fn insert_acquisition(&self, lot: AcquisitionLot) -> Result<AcquisitionLot>;
    async fn insert_disposal(&self, disposal: DisposalEvent) -> Result<DisposalEvent>;

    fn get_disposal(&self, disposal_id: &str) -> Result<DisposalEvent>;
    /// Acquisitions in FIFO order (date, then id).
    fn list_acquisitions(&self) -> Result<Vec<AcquisitionLot>>;
    /// Disposals newest first.
    fn list_disposals(&self) -> Result<Vec<DisposalEvent>>;
    fn load_lot_consumption(&self) -> Result<Vec<LotConsumption>>;
    fn list_allocations(&self, disposal_id: &str) -> Result<Vec<Allocation>>;
    /// Settlement results ordered by disposal date descending, then disposal
    /// id, then chunk index.
    fn list_settlement_results(&self) -> Result<Vec<SettlementResult>>;

    /// Runs `job` in one serialized write transaction.
    async fn run_settlement(&self, job: SettlementJob) -> Result<Vec<SettlementResult>>;
}

/// Trait defining the contract for the ledger service.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    async fn record_acquisition(&self, acquisition: NewAcquisition) -> Result<AcquisitionLot>;
    async fn record_disposal(&self, disposal: NewDisposal) -> Result<DisposalEvent>;
    async fn settle(&self, disposal_id: &str) -> Result<Vec<SettlementResult>>;

    fn current_inventory(&self) -> Result<Vec<InventoryItem>>;
    fn settlement_history(&self) -> Result<Vec<SettlementResult>>;
    fn get_acquisitions(&self) -> Result<Vec<AcquisitionLot>>;
    fn get_disposals(&self) -> Result<Vec<DisposalEvent>>;
    fn get_disposal(&self, disposal_id: &str) -> Result<DisposalEvent>;

    /// Records every vest in a CSV export. The whole file is parsed before
    /// anything is recorded.
    async fn import_acquisitions(&self, content: &[u8], symbol: &str)
        -> Result<Vec<AcquisitionLot>>;
    /// Records every sale in a CSV export. The whole file is parsed before
    /// anything is recorded.
    async fn import_disposals(&self, content: &[u8]) -> Result<Vec<DisposalEvent>>;
}
