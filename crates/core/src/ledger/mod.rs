//! Ledger module - acquisitions, disposals and the service that records and settles them.

mod ledger_model;
mod ledger_service;
mod ledger_traits;

#[cfg(test)]
pub(crate) mod test_support;


pub use ledger_model::{
    AcquisitionLot, Allocation, DisposalEvent, LotConsumption, NewAcquisition, NewDisposal,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::{
    LedgerRepositoryTrait, LedgerServiceTrait, LedgerTransaction, SettlementJob,
};
