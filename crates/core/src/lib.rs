//! CGT Core - Domain entities, services, and traits.
//!
//! This crate contains the settlement engine for equity compensation lots:
//! FIFO matching of disposals against acquisitions and the per-chunk capital
//! gains computation in EUR. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod importer;
pub mod ledger;
pub mod settlement;

// Re-export the ledger and settlement surface
pub use ledger::*;
pub use settlement::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
