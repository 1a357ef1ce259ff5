//! FX (Foreign Exchange) module - USD to EUR reference rates for ledger dates.

mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use fx_errors::FxError;
pub use fx_model::RateQuote;
pub use fx_service::FxService;
pub use fx_traits::RateLookupTrait;
