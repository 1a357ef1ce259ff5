use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use cgt_core::{
    AcquisitionLot, DisposalEvent, InventoryItem, NewAcquisition, NewDisposal, SettlementResult,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct ImportParams {
    symbol: String,
}

async fn get_acquisitions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AcquisitionLot>>> {
    let lots = state.ledger_service.get_acquisitions()?;
    Ok(Json(lots))
}

async fn record_acquisition(
    State(state): State<Arc<AppState>>,
    Json(acquisition): Json<NewAcquisition>,
) -> ApiResult<Json<AcquisitionLot>> {
    let lot = state.ledger_service.record_acquisition(acquisition).await?;
    Ok(Json(lot))
}

async fn import_acquisitions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> ApiResult<Json<Vec<AcquisitionLot>>> {
    let lots = state
        .ledger_service
        .import_acquisitions(&body, &params.symbol)
        .await?;
    Ok(Json(lots))
}

async fn get_disposals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<DisposalEvent>>> {
    let disposals = state.ledger_service.get_disposals()?;
    Ok(Json(disposals))
}

async fn record_disposal(
    State(state): State<Arc<AppState>>,
    Json(disposal): Json<NewDisposal>,
) -> ApiResult<Json<DisposalEvent>> {
    let event = state.ledger_service.record_disposal(disposal).await?;
    Ok(Json(event))
}

async fn import_disposals(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Vec<DisposalEvent>>> {
    let disposals = state.ledger_service.import_disposals(&body).await?;
    Ok(Json(disposals))
}

async fn settle_disposal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SettlementResult>>> {
    let results = state.ledger_service.settle(&id).await?;
    Ok(Json(results))
}

async fn get_inventory(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<InventoryItem>>> {
    let inventory = state.ledger_service.current_inventory()?;
    Ok(Json(inventory))
}

async fn get_settlements(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SettlementResult>>> {
    let history = state.ledger_service.settlement_history()?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/acquisitions",
            get(get_acquisitions).post(record_acquisition),
        )
        .route("/acquisitions/import", post(import_acquisitions))
        .route("/disposals", get(get_disposals).post(record_disposal))
        .route("/disposals/import", post(import_disposals))
        .route("/disposals/{id}/settle", post(settle_disposal))
        .route("/inventory", get(get_inventory))
        .route("/settlements", get(get_settlements))
}
