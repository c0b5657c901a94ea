//! Inventory ledger: validates placement, retrieval and transfer commands and
//! hands them to an [`InventoryRepository`], which applies them atomically.

pub mod validation;

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::{
        CreateItem, CreateLocation, CreateWarehouse, DashboardSummary, Inventory,
        InventoryDetail, Item, Location, LocationWithWarehouse, Movement, MovementQuery,
        PlacementRequest, RetrievalRequest, TransferRequest, Warehouse,
    },
    repository::InventoryRepository,
};

use validation::{optional, positive_quantity, required};

pub const SEARCH_LIMIT: i64 = 20;
pub const DEFAULT_MOVEMENT_LIMIT: i64 = 50;
pub const MAX_MOVEMENT_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct InventoryService {
    repo: Arc<dyn InventoryRepository>,
}

impl InventoryService {
    pub fn new(repo: Arc<dyn InventoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn warehouses(&self) -> AppResult<Vec<Warehouse>> {
        self.repo.list_warehouses().await
    }

    pub async fn create_warehouse(&self, input: CreateWarehouse) -> AppResult<Warehouse> {
        let new = CreateWarehouse {
            code: required("code", &input.code)?,
            name: required("name", &input.name)?,
            address: optional(input.address),
        };
        let warehouse = self.repo.create_warehouse(new).await?;
        log::info!("Created warehouse {} ({})", warehouse.code, warehouse.id);
        Ok(warehouse)
    }

    pub async fn locations(&self) -> AppResult<Vec<LocationWithWarehouse>> {
        self.repo.list_locations().await
    }

    pub async fn create_location(&self, input: CreateLocation) -> AppResult<Location> {
        let new = CreateLocation {
            code: required("code", &input.code)?,
            description: optional(input.description),
            warehouse_id: input.warehouse_id,
        };
        let location = self.repo.create_location(new).await?;
        log::info!("Created location {} ({})", location.code, location.id);
        Ok(location)
    }

    pub async fn items(&self) -> AppResult<Vec<Item>> {
        self.repo.list_items().await
    }

    pub async fn create_item(&self, input: CreateItem) -> AppResult<Item> {
        let new = CreateItem {
            sku: required("sku", &input.sku)?,
            name: required("name", &input.name)?,
            barcode: optional(input.barcode),
        };
        let item = self.repo.create_item(new).await?;
        log::info!("Created item {} ({})", item.sku, item.id);
        Ok(item)
    }

    pub async fn inventory(&self) -> AppResult<Vec<InventoryDetail>> {
        self.repo.list_inventory().await
    }

    /// Returns at most [`SEARCH_LIMIT`] items; a blank query matches nothing.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Item>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.search_items(query, SEARCH_LIMIT).await
    }

    pub async fn movements(&self, query: MovementQuery) -> AppResult<Vec<Movement>> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_MOVEMENT_LIMIT)
            .clamp(1, MAX_MOVEMENT_LIMIT);
        self.repo.list_movements(query.item_id, limit).await
    }

    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        self.repo.summary().await
    }

    pub async fn place(&self, request: PlacementRequest) -> AppResult<Inventory> {
        let qty = positive_quantity(request.qty)?;
        let inventory = self.repo.place(request.item_id, request.location_id, qty).await?;
        log::info!(
            "Placed {} of item {} at {} (now {})",
            qty, request.item_id, request.location_id, inventory.quantity
        );
        Ok(inventory)
    }

    pub async fn retrieve(&self, request: RetrievalRequest) -> AppResult<Inventory> {
        let qty = positive_quantity(request.qty)?;
        let inventory = self.repo.retrieve(request.item_id, request.location_id, qty).await?;
        log::info!(
            "Retrieved {} of item {} from {} (now {})",
            qty, request.item_id, request.location_id, inventory.quantity
        );
        Ok(inventory)
    }

    pub async fn transfer(&self, request: TransferRequest) -> AppResult<Movement> {
        let qty = positive_quantity(request.qty)?;
        ensure_distinct(request.from_location_id, request.to_location_id)?;
        let movement = self
            .repo
            .transfer(request.item_id, request.from_location_id, request.to_location_id, qty)
            .await?;
        log::info!(
            "Transferred {} of item {} from {} to {}",
            qty, request.item_id, request.from_location_id, request.to_location_id
        );
        Ok(movement)
    }
}

fn ensure_distinct(from: Uuid, to: Uuid) -> AppResult<()> {
    if from == to {
        return Err(AppError::InvalidTransfer);
    }
    Ok(())
}
