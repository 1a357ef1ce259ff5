//! Parsing of the brokerage vest release and sale execution reports.
//!
//! Both reports share a layout: a header row, then one row per event with the
//! date in column 0, the USD price (e.g. `$318.47`) in column 5 and the share
//! quantity in column 6. Sale quantities are exported as negative numbers.

use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{Error, ValidationError};
use crate::ledger::{NewAcquisition, NewDisposal};
use crate::Result;

/// Date format used by the reports, e.g. `25-Nov-2025`.
pub const REPORT_DATE_FORMAT: &str = "%d-%b-%Y";

const DATE_COLUMN: usize = 0;
const PRICE_COLUMN: usize = 5;
const QUANTITY_COLUMN: usize = 6;

/// Parses a vest release report into acquisitions of `symbol`.
///
/// Every row is parsed before returning; the first malformed row fails the
/// whole report.
pub fn parse_vest_report<R: Read>(reader: R, symbol: &str) -> Result<Vec<NewAcquisition>> {
    parse_rows(reader, |line, record| {
        let row = ReportRow::parse(line, record)?;
        if row.quantity < Decimal::ZERO {
            return Err(row_error(line, format!("negative vest quantity {}", row.quantity)));
        }
        Ok(NewAcquisition {
            date: row.date,
            symbol: symbol.to_string(),
            quantity: whole_shares(line, row.quantity)?,
            unit_price_cents: row.unit_price_cents,
        })
    })
}

/// Parses a sale execution report into disposals.
pub fn parse_sale_report<R: Read>(reader: R) -> Result<Vec<NewDisposal>> {
    parse_rows(reader, |line, record| {
        let row = ReportRow::parse(line, record)?;
        Ok(NewDisposal {
            date: row.date,
            quantity: whole_shares(line, row.quantity.abs())?,
            unit_price_cents: row.unit_price_cents,
        })
    })
}

struct ReportRow {
    date: NaiveDate,
    unit_price_cents: i64,
    quantity: Decimal,
}

impl ReportRow {
    fn parse(line: u64, record: &StringRecord) -> Result<Self> {
        let date_field = field(line, record, DATE_COLUMN, "date")?;
        let date = NaiveDate::parse_from_str(date_field, REPORT_DATE_FORMAT)
            .map_err(|e| row_error(line, format!("invalid date '{}': {}", date_field, e)))?;

        let price_field = field(line, record, PRICE_COLUMN, "price")?;
        let unit_price_cents = parse_price_cents(price_field)
            .ok_or_else(|| row_error(line, format!("invalid price '{}'", price_field)))?;

        let quantity_field = field(line, record, QUANTITY_COLUMN, "quantity")?;
        let quantity = Decimal::from_str(quantity_field)
            .map_err(|e| row_error(line, format!("invalid quantity '{}': {}", quantity_field, e)))?;

        Ok(Self {
            date,
            unit_price_cents,
            quantity,
        })
    }
}

fn parse_rows<R, T, F>(reader: R, mut parse_row: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(u64, &StringRecord) -> Result<T>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.iter().all(|value| value.is_empty()) {
            continue;
        }
        parsed.push(parse_row(line, &record)?);
    }
    Ok(parsed)
}

fn field<'r>(line: u64, record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(row_error(line, format!("missing {}", name))),
    }
}

/// `$1,318.475` -> 131848 (half to even on sub-cent input).
fn parse_price_cents(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let price = Decimal::from_str(&cleaned).ok()?;
    if price <= Decimal::ZERO {
        return None;
    }
    price
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
}

fn whole_shares(line: u64, quantity: Decimal) -> Result<i64> {
    if !quantity.fract().is_zero() {
        return Err(row_error(
            line,
            format!("quantity {} is not a whole number of shares", quantity),
        ));
    }
    quantity
        .to_i64()
        .ok_or_else(|| row_error(line, format!("quantity {} is out of range", quantity)))
}

fn row_error(line: u64, message: String) -> Error {
    ValidationError::InvalidInput(format!("line {}: {}", line, message)).into()
}
