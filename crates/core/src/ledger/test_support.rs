//! In-memory ledger and rate lookup shared by the core test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{
    AcquisitionLot, Allocation, DisposalEvent, LedgerRepositoryTrait, LedgerTransaction,
    LotConsumption, SettlementJob,
};
use crate::errors::{DatabaseError, Result};
use crate::fx::{FxError, RateLookupTrait, RateQuote};
use crate::settlement::{SettlementError, SettlementResult};

pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub(crate) fn lot(id: &str, on: &str, quantity: i64, price: i64, rate: Decimal) -> AcquisitionLot {
    AcquisitionLot {
        id: id.to_string(),
        date: date(on),
        symbol: "ADSK".to_string(),
        quantity,
        unit_price_cents: price,
        rate,
        rate_date: date(on),
    }
}

pub(crate) fn disposal(id: &str, on: &str, quantity: i64, price: i64, rate: Decimal) -> DisposalEvent {
    DisposalEvent {
        id: id.to_string(),
        date: date(on),
        quantity,
        unit_price_cents: price,
        rate,
        rate_date: date(on),
        is_settled: false,
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct LedgerState {
    pub acquisitions: Vec<AcquisitionLot>,
    pub disposals: Vec<DisposalEvent>,
    pub allocations: Vec<Allocation>,
    pub results: Vec<SettlementResult>,
}

impl LedgerState {
    fn consumption(&self) -> Vec<LotConsumption> {
        self.acquisitions
            .iter()
            .map(|lot| LotConsumption {
                lot: lot.clone(),
                consumed_quantity: self
                    .allocations
                    .iter()
                    .filter(|a| a.acquisition_id == lot.id)
                    .map(|a| a.quantity)
                    .sum(),
            })
            .collect()
    }

    fn disposal(&self, disposal_id: &str) -> Result<DisposalEvent> {
        self.disposals
            .iter()
            .find(|d| d.id == disposal_id)
            .cloned()
            .ok_or_else(|| SettlementError::DisposalNotFound(disposal_id.to_string()).into())
    }

    pub fn allocations_for(&self, disposal_id: &str) -> Vec<Allocation> {
        self.allocations
            .iter()
            .filter(|a| a.disposal_id == disposal_id)
            .cloned()
            .collect()
    }
}

/// Transaction over a working copy of the state.
pub(crate) struct InMemoryTransaction<'a> {
    pub state: &'a mut LedgerState,
    pub fail_on_result_insert: bool,
}

impl LedgerTransaction for InMemoryTransaction<'_> {
    fn get_disposal(&mut self, disposal_id: &str) -> Result<DisposalEvent> {
        self.state.disposal(disposal_id)
    }

    fn load_lot_consumption(&mut self) -> Result<Vec<LotConsumption>> {
        Ok(self.state.consumption())
    }

    fn insert_allocation(&mut self, allocation: &Allocation) -> Result<()> {
        let duplicate = self.state.allocations.iter().any(|a| {
            a.disposal_id == allocation.disposal_id && a.acquisition_id == allocation.acquisition_id
        });
        if duplicate {
            return Err(DatabaseError::UniqueViolation(format!(
                "{}/{}",
                allocation.disposal_id, allocation.acquisition_id
            ))
            .into());
        }
        self.state.allocations.push(allocation.clone());
        Ok(())
    }

    fn insert_settlement_result(&mut self, result: &SettlementResult) -> Result<()> {
        if self.fail_on_result_insert {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        self.state.results.push(result.clone());
        Ok(())
    }

    fn mark_disposal_settled(&mut self, disposal_id: &str) -> Result<()> {
        let disposal = self
            .state
            .disposals
            .iter_mut()
            .find(|d| d.id == disposal_id)
            .ok_or_else(|| SettlementError::DisposalNotFound(disposal_id.to_string()))?;
        if disposal.is_settled {
            return Err(SettlementError::AlreadySettled {
                disposal_id: disposal_id.to_string(),
            }
            .into());
        }
        disposal.is_settled = true;
        Ok(())
    }
}

/// Repository that commits a settlement's working copy only when the job succeeds.
#[derive(Default)]
pub(crate) struct InMemoryLedger {
    state: Mutex<LedgerState>,
    fail_on_result_insert: AtomicBool,
}

impl InMemoryLedger {
    pub fn with_state(state: LedgerState) -> Self {
        Self {
            state: Mutex::new(state),
            fail_on_result_insert: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> LedgerState {
        self.state.lock().unwrap().clone()
    }

    pub fn fail_result_inserts(&self, fail: bool) {
        self.fail_on_result_insert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerRepositoryTrait for InMemoryLedger {
    async fn insert_acquisition(&self, lot: AcquisitionLot) -> Result<AcquisitionLot> {
        self.state.lock().unwrap().acquisitions.push(lot.clone());
        Ok(lot)
    }

    async fn insert_disposal(&self, disposal: DisposalEvent) -> Result<DisposalEvent> {
        self.state.lock().unwrap().disposals.push(disposal.clone());
        Ok(disposal)
    }

    fn get_disposal(&self, disposal_id: &str) -> Result<DisposalEvent> {
        self.state.lock().unwrap().disposal(disposal_id)
    }

    fn list_acquisitions(&self) -> Result<Vec<AcquisitionLot>> {
        let mut lots = self.state.lock().unwrap().acquisitions.clone();
        lots.sort_by(crate::settlement::fifo_order);
        Ok(lots)
    }

    fn list_disposals(&self) -> Result<Vec<DisposalEvent>> {
        let mut disposals = self.state.lock().unwrap().disposals.clone();
        disposals.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(disposals)
    }

    fn load_lot_consumption(&self) -> Result<Vec<LotConsumption>> {
        Ok(self.state.lock().unwrap().consumption())
    }

    fn list_allocations(&self, disposal_id: &str) -> Result<Vec<Allocation>> {
        Ok(self.state.lock().unwrap().allocations_for(disposal_id))
    }

    fn list_settlement_results(&self) -> Result<Vec<SettlementResult>> {
        let mut results = self.state.lock().unwrap().results.clone();
        results.sort_by(|a, b| {
            b.disposal_date
                .cmp(&a.disposal_date)
                .then_with(|| a.disposal_id.cmp(&b.disposal_id))
                .then_with(|| a.chunk_index.cmp(&b.chunk_index))
        });
        Ok(results)
    }

    async fn run_settlement(&self, job: SettlementJob) -> Result<Vec<SettlementResult>> {
        let mut committed = self.state.lock().unwrap();
        let mut working = committed.clone();
        let outcome = {
            let mut tx = InMemoryTransaction {
                state: &mut working,
                fail_on_result_insert: self.fail_on_result_insert.load(Ordering::SeqCst),
            };
            job(&mut tx)
        };
        if outcome.is_ok() {
            *committed = working;
        }
        outcome
    }
}

/// Rate lookup answering from a fixed table.
#[derive(Default)]
pub(crate) struct StaticRateLookup {
    rates: HashMap<NaiveDate, (Decimal, NaiveDate)>,
    pub calls: AtomicUsize,
}

impl StaticRateLookup {
    pub fn with_rate(mut self, on: &str, rate: Decimal) -> Self {
        self.rates.insert(date(on), (rate, date(on)));
        self
    }

    pub fn with_fallback(mut self, on: &str, effective: &str, rate: Decimal) -> Self {
        self.rates.insert(date(on), (rate, date(effective)));
        self
    }
}

#[async_trait]
impl RateLookupTrait for StaticRateLookup {
    async fn rate_for(&self, on: NaiveDate) -> Result<RateQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (rate, effective_date) = self
            .rates
            .get(&on)
            .copied()
            .ok_or(FxError::RateNotFound(on))?;
        Ok(RateQuote {
            rate,
            effective_date,
            requested_date: on,
        })
    }
}
