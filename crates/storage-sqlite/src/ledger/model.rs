//! Database models for the ledger.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use rust_decimal::Decimal;

use cgt_core::constants::DATE_FORMAT;
use cgt_core::{AcquisitionLot, Allocation, DisposalEvent, LotConsumption, SettlementResult};

use crate::errors::StorageError;

/// Database model for vests
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::vests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VestDB {
    pub id: String,
    pub date: String,
    pub symbol: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub exchange_rate: String,
    pub rate_date: String,
}

/// Database model for sales
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::sales)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SaleDB {
    pub id: String,
    pub date: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub exchange_rate: String,
    pub rate_date: String,
    pub is_settled: bool,
}

/// Database model for the shares of one vest consumed by one sale
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::sale_lots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SaleLotDB {
    pub sale_id: String,
    pub vest_id: String,
    pub quantity: i64,
}

/// Database model for settlement results
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::settled_sales)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SettledSaleDB {
    pub id: String,
    pub sale_id: String,
    pub vest_id: String,
    pub chunk_index: i32,
    pub sale_date: String,
    pub ticker: String,
    pub num_shares: i64,
    pub sale_price_usd_cents: i64,
    pub gain_loss_usd_cents: i64,
    pub book_value_usd_cents: i64,
    pub exchange_rate_at_vest: String,
    pub gross_proceed_usd_cents: i64,
    pub vesting_value_usd_cents: i64,
    pub exchange_rate_at_sale: String,
    pub euro_cost_eur_cents: i64,
    pub euro_sale_eur_cents: i64,
    pub euro_gain_eur_cents: i64,
    pub cgt_tax_due_eur_cents: i64,
    pub net_proceeds_eur_cents: i64,
    pub completed: String,
    pub settlement_type: String,
}

/// A vest row joined with the total quantity allocated against it.
#[derive(QueryableByName, Debug, Clone)]
pub struct VestConsumptionDB {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub date: String,
    #[diesel(sql_type = Text)]
    pub symbol: String,
    #[diesel(sql_type = BigInt)]
    pub quantity: i64,
    #[diesel(sql_type = BigInt)]
    pub unit_price_cents: i64,
    #[diesel(sql_type = Text)]
    pub exchange_rate: String,
    #[diesel(sql_type = Text)]
    pub rate_date: String,
    #[diesel(sql_type = BigInt)]
    pub consumed_quantity: i64,
}

fn parse_date(value: &str, column: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::Corrupt(format!("{} '{}': {}", column, value, e)))
}

fn parse_rate(value: &str, column: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::Corrupt(format!("{} '{}': {}", column, value, e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// Conversion to domain models
impl TryFrom<VestDB> for AcquisitionLot {
    type Error = StorageError;

    fn try_from(db: VestDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&db.date, "vests.date")?,
            rate: parse_rate(&db.exchange_rate, "vests.exchange_rate")?,
            rate_date: parse_date(&db.rate_date, "vests.rate_date")?,
            id: db.id,
            symbol: db.symbol,
            quantity: db.quantity,
            unit_price_cents: db.unit_price_cents,
        })
    }
}

impl TryFrom<SaleDB> for DisposalEvent {
    type Error = StorageError;

    fn try_from(db: SaleDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&db.date, "sales.date")?,
            rate: parse_rate(&db.exchange_rate, "sales.exchange_rate")?,
            rate_date: parse_date(&db.rate_date, "sales.rate_date")?,
            id: db.id,
            quantity: db.quantity,
            unit_price_cents: db.unit_price_cents,
            is_settled: db.is_settled,
        })
    }
}

impl TryFrom<VestConsumptionDB> for LotConsumption {
    type Error = StorageError;

    fn try_from(db: VestConsumptionDB) -> Result<Self, Self::Error> {
        let consumed_quantity = db.consumed_quantity;
        let lot = AcquisitionLot::try_from(VestDB {
            id: db.id,
            date: db.date,
            symbol: db.symbol,
            quantity: db.quantity,
            unit_price_cents: db.unit_price_cents,
            exchange_rate: db.exchange_rate,
            rate_date: db.rate_date,
        })?;
        Ok(Self {
            lot,
            consumed_quantity,
        })
    }
}

impl From<SaleLotDB> for Allocation {
    fn from(db: SaleLotDB) -> Self {
        Self {
            disposal_id: db.sale_id,
            acquisition_id: db.vest_id,
            quantity: db.quantity,
        }
    }
}

impl TryFrom<SettledSaleDB> for SettlementResult {
    type Error = StorageError;

    fn try_from(db: SettledSaleDB) -> Result<Self, Self::Error> {
        Ok(Self {
            disposal_date: parse_date(&db.sale_date, "settled_sales.sale_date")?,
            acquisition_rate: parse_rate(
                &db.exchange_rate_at_vest,
                "settled_sales.exchange_rate_at_vest",
            )?,
            disposal_rate: parse_rate(
                &db.exchange_rate_at_sale,
                "settled_sales.exchange_rate_at_sale",
            )?,
            id: db.id,
            disposal_id: db.sale_id,
            acquisition_id: db.vest_id,
            chunk_index: db.chunk_index,
            symbol: db.ticker,
            shares: db.num_shares,
            sale_proceeds_usd_cents: db.sale_price_usd_cents,
            gain_usd_cents: db.gain_loss_usd_cents,
            cost_basis_usd_cents: db.book_value_usd_cents,
            gross_proceeds_usd_cents: db.gross_proceed_usd_cents,
            acquisition_value_usd_cents: db.vesting_value_usd_cents,
            cost_basis_eur_cents: db.euro_cost_eur_cents,
            proceeds_eur_cents: db.euro_sale_eur_cents,
            gain_eur_cents: db.euro_gain_eur_cents,
            tax_due_eur_cents: db.cgt_tax_due_eur_cents,
            net_proceeds_eur_cents: db.net_proceeds_eur_cents,
            completed: db.completed,
            method: db.settlement_type,
        })
    }
}

// Conversion from domain models
impl From<&AcquisitionLot> for VestDB {
    fn from(lot: &AcquisitionLot) -> Self {
        Self {
            id: lot.id.clone(),
            date: format_date(lot.date),
            symbol: lot.symbol.clone(),
            quantity: lot.quantity,
            unit_price_cents: lot.unit_price_cents,
            exchange_rate: lot.rate.to_string(),
            rate_date: format_date(lot.rate_date),
        }
    }
}

impl From<&DisposalEvent> for SaleDB {
    fn from(disposal: &DisposalEvent) -> Self {
        Self {
            id: disposal.id.clone(),
            date: format_date(disposal.date),
            quantity: disposal.quantity,
            unit_price_cents: disposal.unit_price_cents,
            exchange_rate: disposal.rate.to_string(),
            rate_date: format_date(disposal.rate_date),
            is_settled: disposal.is_settled,
        }
    }
}

impl From<&Allocation> for SaleLotDB {
    fn from(allocation: &Allocation) -> Self {
        Self {
            sale_id: allocation.disposal_id.clone(),
            vest_id: allocation.acquisition_id.clone(),
            quantity: allocation.quantity,
        }
    }
}

impl From<&SettlementResult> for SettledSaleDB {
    fn from(result: &SettlementResult) -> Self {
        Self {
            id: result.id.clone(),
            sale_id: result.disposal_id.clone(),
            vest_id: result.acquisition_id.clone(),
            chunk_index: result.chunk_index,
            sale_date: format_date(result.disposal_date),
            ticker: result.symbol.clone(),
            num_shares: result.shares,
            sale_price_usd_cents: result.sale_proceeds_usd_cents,
            gain_loss_usd_cents: result.gain_usd_cents,
            book_value_usd_cents: result.cost_basis_usd_cents,
            exchange_rate_at_vest: result.acquisition_rate.to_string(),
            gross_proceed_usd_cents: result.gross_proceeds_usd_cents,
            vesting_value_usd_cents: result.acquisition_value_usd_cents,
            exchange_rate_at_sale: result.disposal_rate.to_string(),
            euro_cost_eur_cents: result.cost_basis_eur_cents,
            euro_sale_eur_cents: result.proceeds_eur_cents,
            euro_gain_eur_cents: result.gain_eur_cents,
            cgt_tax_due_eur_cents: result.tax_due_eur_cents,
            net_proceeds_eur_cents: result.net_proceeds_eur_cents,
            completed: result.completed.clone(),
            settlement_type: result.method.clone(),
        }
    }
}
