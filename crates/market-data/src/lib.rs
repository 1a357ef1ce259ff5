//! CGT Market Data Crate
//!
//! Fetches historical reference exchange rates for the CGT ledger.
//!
//! # Overview
//!
//! The ledger freezes a USD→EUR reference rate onto every acquisition and
//! disposal when it is first recorded. This crate supplies that rate:
//! - [`ExchangeRateProvider`] abstracts a source of daily reference rates
//! - [`FrankfurterProvider`] reads ECB reference rates from the Frankfurter API
//! - [`HistoricalRateResolver`] walks back over non-trading days until a
//!   published rate is found
//!
//! ```text
//!   requested date ──► HistoricalRateResolver ──► ExchangeRateProvider
//!                          │  (404? step back a day)        │
//!                          ◄────────── ReferenceRate ◄──────┘
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

pub use errors::{MarketDataError, RetryClass};
pub use models::ReferenceRate;
pub use provider::frankfurter::FrankfurterProvider;
pub use provider::ExchangeRateProvider;
pub use resolver::{HistoricalRateResolver, ResolverSettings};
