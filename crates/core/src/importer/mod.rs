//! Importers for brokerage CSV reports.

mod csv_parser;

pub use csv_parser::{parse_sale_report, parse_vest_report, REPORT_DATE_FORMAT};
