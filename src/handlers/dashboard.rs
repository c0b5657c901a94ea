use axum::{extract::State, response::Json};

use crate::{errors::AppResult, ledger::InventoryService, models::DashboardSummary};

pub async fn dashboard(
    State(ledger): State<InventoryService>,
) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(ledger.summary().await?))
}
