use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    errors::{AppError, AppResult},
    ledger::InventoryService,
    models::{CreateItem, Item, SearchQuery},
};

pub async fn items_list(
    State(ledger): State<InventoryService>,
) -> AppResult<Json<Vec<Item>>> {
    Ok(Json(ledger.items().await?))
}

pub async fn create_item(
    State(ledger): State<InventoryService>,
    WithRejection(Json(body), _): WithRejection<Json<CreateItem>, AppError>,
) -> AppResult<Json<Item>> {
    Ok(Json(ledger.create_item(body).await?))
}

// GET /api/search?q=...
pub async fn search(
    State(ledger): State<InventoryService>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<Vec<Item>>> {
    Ok(Json(ledger.search(&query.q).await?))
}
