//! Reference rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `ExchangeRateProvider` trait that all providers implement
//! - The Frankfurter (ECB reference rates) provider

mod traits;

pub mod frankfurter;

pub use traits::ExchangeRateProvider;
