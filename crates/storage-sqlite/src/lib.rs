//! SQLite ledger store for the CGT settlement engine.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `cgt-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The ledger repository and its transactional view used by settlement
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!           core (domain)
//!                │
//!                ▼
//!   storage-sqlite (this crate)
//!                │
//!                ▼
//!            SQLite DB
//! ```
//!
//! Every write, including a whole settlement, runs as one job on the single
//! writer actor inside an `IMMEDIATE` transaction.

pub mod db;
pub mod errors;
pub mod ledger;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use ledger::LedgerRepository;

// Re-export from cgt-core for convenience
pub use cgt_core::errors::{DatabaseError, Error, Result};
