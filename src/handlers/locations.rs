use axum::{extract::State, response::Json};
use axum_extra::extract::WithRejection;

use crate::{
    errors::{AppError, AppResult},
    ledger::InventoryService,
    models::{CreateLocation, Location, LocationWithWarehouse},
};

pub async fn locations_list(
    State(ledger): State<InventoryService>,
) -> AppResult<Json<Vec<LocationWithWarehouse>>> {
    Ok(Json(ledger.locations().await?))
}

pub async fn create_location(
    State(ledger): State<InventoryService>,
    WithRejection(Json(body), _): WithRejection<Json<CreateLocation>, AppError>,
) -> AppResult<Json<Location>> {
    Ok(Json(ledger.create_location(body).await?))
}
