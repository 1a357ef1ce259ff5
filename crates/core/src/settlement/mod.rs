//! Settlement module - FIFO matching of disposals against acquisition lots.
//!
//! The pieces are layered so that only the orchestrator touches the ledger:
//! - [`resolve_inventory`] derives remaining quantities from lot consumption
//! - [`match_fifo`] walks the ordered inventory for a demanded quantity
//! - [`compute_chunk`] prices one matched chunk in USD and EUR
//! - [`settle_disposal`] runs the above inside one ledger transaction

mod fifo_matcher;
mod inventory;
mod orchestrator;
mod settlement_errors;
mod settlement_model;
mod tax_calculator;


pub use fifo_matcher::{match_fifo, LotMatch, MatchOutcome};
pub use inventory::{fifo_order, resolve_inventory, InventoryItem};
pub use orchestrator::settle_disposal;
pub use settlement_errors::SettlementError;
pub use settlement_model::SettlementResult;
pub use tax_calculator::{compute_chunk, to_minor_units, ChunkComputation};
