use serde::{Deserialize, Serialize};

use super::inventory::InventoryItem;
use crate::ledger::AcquisitionLot;

/// Shares taken from one lot for one disposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LotMatch {
    pub lot: AcquisitionLot,
    pub quantity: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub matches: Vec<LotMatch>,
    /// Demand left over once inventory ran out. Zero on a full match.
    pub unmatched: i64,
}

impl MatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.unmatched == 0
    }

    pub fn matched_quantity(&self) -> i64 {
        self.matches.iter().map(|m| m.quantity).sum()
    }
}

/// Consumes `demand` shares from `inventory`, oldest lot first.
///
/// `inventory` must already be in FIFO order (see [`super::resolve_inventory`]).
/// Remaining quantities are decremented in place so the same inventory can
/// feed several disposals in sequence.
pub fn match_fifo(demand: i64, inventory: &mut [InventoryItem]) -> MatchOutcome {
    debug_assert!(inventory
        .windows(2)
        .all(|w| super::fifo_order(&w[0].lot, &w[1].lot).is_le()));

    let mut remainder = demand.max(0);
    let mut matches = Vec::new();

    for item in inventory.iter_mut() {
        if remainder == 0 {
            break;
        }
        if item.remaining_quantity <= 0 {
            continue;
        }

        let take = remainder.min(item.remaining_quantity);
        item.remaining_quantity -= take;
        remainder -= take;
        matches.push(LotMatch {
            lot: item.lot.clone(),
            quantity: take,
        });
    }

    MatchOutcome {
        matches,
        unmatched: remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::resolve_inventory;
    use crate::ledger::LotConsumption;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn inventory(lots: &[(&str, &str, i64)]) -> Vec<InventoryItem> {
        resolve_inventory(
            lots.iter()
                .map(|(id, date, quantity)| {
                    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
                    LotConsumption {
                        lot: AcquisitionLot {
                            id: id.to_string(),
                            date,
                            symbol: "ADSK".to_string(),
                            quantity: *quantity,
                            unit_price_cents: 10_000,
                            rate: dec!(0.93),
                            rate_date: date,
                        },
                        consumed_quantity: 0,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn test_consumes_oldest_lots_first() {
        let mut open = inventory(&[
            ("d3", "2023-03-01", 5),
            ("d1", "2023-01-01", 5),
            ("d2", "2023-02-01", 5),
        ]);

        let outcome = match_fifo(8, &mut open);

        assert!(outcome.is_complete());
        let taken: Vec<(&str, i64)> = outcome
            .matches
            .iter()
            .map(|m| (m.lot.id.as_str(), m.quantity))
            .collect();
        assert_eq!(taken, vec![("d1", 5), ("d2", 3)]);
        assert_eq!(open[0].remaining_quantity, 0);
        assert_eq!(open[1].remaining_quantity, 2);
        assert_eq!(open[2].remaining_quantity, 5);
    }

    #[test]
    fn test_reports_shortfall() {
        let mut open = inventory(&[("a", "2023-01-01", 3), ("b", "2023-02-01", 4)]);

        let outcome = match_fifo(10, &mut open);

        assert_eq!(outcome.unmatched, 3);
        assert_eq!(outcome.matched_quantity(), 7);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_sequential_disposals_share_inventory() {
        let mut open = inventory(&[("a", "2023-01-01", 5), ("b", "2023-02-01", 5)]);

        let first = match_fifo(4, &mut open);
        let second = match_fifo(4, &mut open);

        assert_eq!(first.matches.len(), 1);
        assert_eq!(second.matches[0].lot.id, "a");
        assert_eq!(second.matches[0].quantity, 1);
        assert_eq!(second.matches[1].lot.id, "b");
        assert_eq!(second.matches[1].quantity, 3);
    }

    #[test]
    fn test_empty_inventory_and_zero_demand() {
        let mut open: Vec<InventoryItem> = Vec::new();
        let outcome = match_fifo(2, &mut open);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.unmatched, 2);

        let mut open = inventory(&[("a", "2023-01-01", 5)]);
        let outcome = match_fifo(0, &mut open);
        assert!(outcome.is_complete());
        assert!(outcome.matches.is_empty());
    }
}
