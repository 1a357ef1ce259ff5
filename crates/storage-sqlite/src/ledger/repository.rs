use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use cgt_core::{
    AcquisitionLot, Allocation, DisposalEvent, LedgerRepositoryTrait, LedgerTransaction,
    LotConsumption, Result, SettlementError, SettlementJob, SettlementResult,
};

use super::model::{SaleDB, SaleLotDB, SettledSaleDB, VestConsumptionDB, VestDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{sale_lots, sales, settled_sales, vests};

const LOT_CONSUMPTION_SQL: &str = "
    SELECT v.id, v.date, v.symbol, v.quantity, v.unit_price_cents, v.exchange_rate, v.rate_date,
           CAST(COALESCE(SUM(sl.quantity), 0) AS INTEGER) AS consumed_quantity
    FROM vests v
    LEFT JOIN sale_lots sl ON sl.vest_id = v.id
    GROUP BY v.id
    ORDER BY v.date ASC, v.id ASC";

pub struct LedgerRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        LedgerRepository { pool, writer }
    }
}

fn find_sale(conn: &mut SqliteConnection, sale_id: &str) -> Result<DisposalEvent> {
    let row = sales::table
        .find(sale_id)
        .select(SaleDB::as_select())
        .first::<SaleDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| SettlementError::DisposalNotFound(sale_id.to_string()))?;
    Ok(DisposalEvent::try_from(row)?)
}

fn lot_consumption(conn: &mut SqliteConnection) -> Result<Vec<LotConsumption>> {
    let rows = diesel::sql_query(LOT_CONSUMPTION_SQL)
        .load::<VestConsumptionDB>(conn)
        .into_core()?;
    rows.into_iter()
        .map(|row| LotConsumption::try_from(row).map_err(Into::into))
        .collect()
}

/// Ledger access bound to the writer's open transaction.
pub struct SqliteLedgerTransaction<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteLedgerTransaction<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl LedgerTransaction for SqliteLedgerTransaction<'_> {
    fn get_disposal(&mut self, disposal_id: &str) -> Result<DisposalEvent> {
        find_sale(&mut *self.conn, disposal_id)
    }

    fn load_lot_consumption(&mut self) -> Result<Vec<LotConsumption>> {
        lot_consumption(&mut *self.conn)
    }

    fn insert_allocation(&mut self, allocation: &Allocation) -> Result<()> {
        diesel::insert_into(sale_lots::table)
            .values(SaleLotDB::from(allocation))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn insert_settlement_result(&mut self, result: &SettlementResult) -> Result<()> {
        diesel::insert_into(settled_sales::table)
            .values(SettledSaleDB::from(result))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn mark_disposal_settled(&mut self, disposal_id: &str) -> Result<()> {
        let updated = diesel::update(
            sales::table
                .filter(sales::id.eq(disposal_id))
                .filter(sales::is_settled.eq(false)),
        )
        .set(sales::is_settled.eq(true))
        .execute(&mut *self.conn)
        .into_core()?;

        if updated == 0 {
            // Either gone or flipped by an earlier settlement.
            find_sale(&mut *self.conn, disposal_id)?;
            return Err(SettlementError::AlreadySettled {
                disposal_id: disposal_id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn insert_acquisition(&self, lot: AcquisitionLot) -> Result<AcquisitionLot> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AcquisitionLot> {
                let row = diesel::insert_into(vests::table)
                    .values(VestDB::from(&lot))
                    .returning(VestDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(AcquisitionLot::try_from(row)?)
            })
            .await
    }

    async fn insert_disposal(&self, disposal: DisposalEvent) -> Result<DisposalEvent> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DisposalEvent> {
                let row = diesel::insert_into(sales::table)
                    .values(SaleDB::from(&disposal))
                    .returning(SaleDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(DisposalEvent::try_from(row)?)
            })
            .await
    }

    fn get_disposal(&self, disposal_id: &str) -> Result<DisposalEvent> {
        let mut conn = get_connection(&self.pool)?;
        find_sale(&mut conn, disposal_id)
    }

    fn list_acquisitions(&self) -> Result<Vec<AcquisitionLot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = vests::table
            .select(VestDB::as_select())
            .order((vests::date.asc(), vests::id.asc()))
            .load::<VestDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| AcquisitionLot::try_from(row).map_err(Into::into))
            .collect()
    }

    fn list_disposals(&self) -> Result<Vec<DisposalEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = sales::table
            .select(SaleDB::as_select())
            .order((sales::date.desc(), sales::id.asc()))
            .load::<SaleDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| DisposalEvent::try_from(row).map_err(Into::into))
            .collect()
    }

    fn load_lot_consumption(&self) -> Result<Vec<LotConsumption>> {
        let mut conn = get_connection(&self.pool)?;
        lot_consumption(&mut conn)
    }

    fn list_allocations(&self, disposal_id: &str) -> Result<Vec<Allocation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = sale_lots::table
            .filter(sale_lots::sale_id.eq(disposal_id))
            .select(SaleLotDB::as_select())
            .order(sale_lots::vest_id.asc())
            .load::<SaleLotDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Allocation::from).collect())
    }

    fn list_settlement_results(&self) -> Result<Vec<SettlementResult>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = settled_sales::table
            .select(SettledSaleDB::as_select())
            .order((
                settled_sales::sale_date.desc(),
                settled_sales::sale_id.asc(),
                settled_sales::chunk_index.asc(),
            ))
            .load::<SettledSaleDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| SettlementResult::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn run_settlement(&self, job: SettlementJob) -> Result<Vec<SettlementResult>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<SettlementResult>> {
                let mut tx = SqliteLedgerTransaction::new(conn);
                job(&mut tx)
            })
            .await
    }
}
