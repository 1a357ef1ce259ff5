use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Statutory capital gains tax rate applied to the EUR gain of each chunk
pub const CGT_RATE: Decimal = dec!(0.33);

/// Lot matching method recorded on every settlement result
pub const SETTLEMENT_METHOD_FIFO: &str = "FIFO";

/// Completion marker recorded on every settlement result
pub const SETTLEMENT_COMPLETED: &str = "Y";

/// Currency of share prices
pub const BASE_CURRENCY: &str = "USD";

/// Currency gains are reported in
pub const REPORTING_CURRENCY: &str = "EUR";

/// Minor units per major unit for both currencies
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Date format for ledger dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
