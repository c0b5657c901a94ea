use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    ledger::InventoryService,
    models::{
        Inventory, InventoryDetail, Movement, MovementQuery,
        PlacementRequest, RetrievalRequest, TransferRequest,
    },
};

#[derive(Serialize)]
pub struct TransferResponse {
    pub ok: bool,
}

pub async fn inventory_list(
    State(ledger): State<InventoryService>,
) -> AppResult<Json<Vec<InventoryDetail>>> {
    Ok(Json(ledger.inventory().await?))
}

pub async fn placement(
    State(ledger): State<InventoryService>,
    WithRejection(Json(body), _): WithRejection<Json<PlacementRequest>, AppError>,
) -> AppResult<Json<Inventory>> {
    Ok(Json(ledger.place(body).await?))
}

pub async fn retrieval(
    State(ledger): State<InventoryService>,
    WithRejection(Json(body), _): WithRejection<Json<RetrievalRequest>, AppError>,
) -> AppResult<Json<Inventory>> {
    Ok(Json(ledger.retrieve(body).await?))
}

pub async fn transfer(
    State(ledger): State<InventoryService>,
    WithRejection(Json(body), _): WithRejection<Json<TransferRequest>, AppError>,
) -> AppResult<Json<TransferResponse>> {
    ledger.transfer(body).await?;
    Ok(Json(TransferResponse { ok: true }))
}

pub async fn movements_list(
    State(ledger): State<InventoryService>,
    WithRejection(Query(query), _): WithRejection<Query<MovementQuery>, AppError>,
) -> AppResult<Json<Vec<Movement>>> {
    Ok(Json(ledger.movements(query).await?))
}
