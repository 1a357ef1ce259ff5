//! SQLite storage implementation for the ledger.

mod model;
mod repository;

pub use model::{SaleDB, SaleLotDB, SettledSaleDB, VestConsumptionDB, VestDB};
pub use repository::{LedgerRepository, SqliteLedgerTransaction};
