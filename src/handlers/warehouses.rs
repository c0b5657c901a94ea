use axum::{extract::State, response::Json};
use axum_extra::extract::WithRejection;

use crate::{
    errors::{AppError, AppResult},
    ledger::InventoryService,
    models::{CreateWarehouse, Warehouse},
};

pub async fn warehouses_list(
    State(ledger): State<InventoryService>,
) -> AppResult<Json<Vec<Warehouse>>> {
    Ok(Json(ledger.warehouses().await?))
}

pub async fn create_warehouse(
    State(ledger): State<InventoryService>,
    WithRejection(Json(body), _): WithRejection<Json<CreateWarehouse>, AppError>,
) -> AppResult<Json<Warehouse>> {
    Ok(Json(ledger.create_warehouse(body).await?))
}
