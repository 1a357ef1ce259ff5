use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ledger::{AcquisitionLot, LotConsumption};

/// An acquisition lot together with the shares not yet allocated to any disposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(flatten)]
    pub lot: AcquisitionLot,
    pub remaining_quantity: i64,
}

/// Total order used for matching: acquisition date, then lot id.
pub fn fifo_order(a: &AcquisitionLot, b: &AcquisitionLot) -> Ordering {
    a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id))
}

/// Derives the open inventory from raw lot consumption.
///
/// Fully consumed lots are dropped. The result is in FIFO order regardless of
/// the order the store returned.
pub fn resolve_inventory(consumption: Vec<LotConsumption>) -> Vec<InventoryItem> {
    let mut inventory: Vec<InventoryItem> = consumption
        .into_iter()
        .filter_map(|entry| {
            let remaining_quantity = entry.lot.quantity - entry.consumed_quantity;
            if remaining_quantity < 0 {
                log::error!(
                    "Lot {} is over-allocated: {} of {} shares consumed",
                    entry.lot.id,
                    entry.consumed_quantity,
                    entry.lot.quantity
                );
            }
            (remaining_quantity > 0).then_some(InventoryItem {
                lot: entry.lot,
                remaining_quantity,
            })
        })
        .collect();

    inventory.sort_by(|a, b| fifo_order(&a.lot, &b.lot));
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn lot(id: &str, date: &str, quantity: i64) -> AcquisitionLot {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        AcquisitionLot {
            id: id.to_string(),
            date,
            symbol: "ADSK".to_string(),
            quantity,
            unit_price_cents: 10_000,
            rate: dec!(0.93),
            rate_date: date,
        }
    }

    fn consumed(lot: AcquisitionLot, consumed_quantity: i64) -> LotConsumption {
        LotConsumption {
            lot,
            consumed_quantity,
        }
    }

    #[test]
    fn test_orders_by_date_then_id() {
        let inventory = resolve_inventory(vec![
            consumed(lot("c", "2023-03-01", 5), 0),
            consumed(lot("b", "2023-01-10", 5), 0),
            consumed(lot("a", "2023-01-10", 5), 0),
        ]);

        let ids: Vec<&str> = inventory.iter().map(|i| i.lot.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_subtracts_consumption_and_drops_exhausted_lots() {
        let inventory = resolve_inventory(vec![
            consumed(lot("a", "2023-01-10", 5), 5),
            consumed(lot("b", "2023-02-10", 5), 3),
            consumed(lot("c", "2023-03-10", 5), 0),
        ]);

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory[0].lot.id, "b");
        assert_eq!(inventory[0].remaining_quantity, 2);
        assert_eq!(inventory[1].remaining_quantity, 5);
    }

    #[test]
    fn test_over_allocated_lot_is_excluded() {
        let inventory = resolve_inventory(vec![consumed(lot("a", "2023-01-10", 5), 6)]);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_item_serializes_flat() {
        let item = InventoryItem {
            lot: lot("a", "2023-01-10", 5),
            remaining_quantity: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["date"], "2023-01-10");
        assert_eq!(json["remainingQuantity"], 2);
    }
}
