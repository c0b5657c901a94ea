pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppResult,
    models::{
        CreateItem, CreateLocation, CreateWarehouse, DashboardSummary, Inventory,
        InventoryDetail, Item, Location, LocationWithWarehouse, Movement, Warehouse,
    },
};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Storage behind the inventory ledger.
///
/// Implementations receive input that has already been validated by
/// [`crate::ledger::InventoryService`]: quantities are positive and transfer
/// endpoints differ. Each mutation must be atomic, must never leave a
/// negative quantity behind and must append exactly one [`Movement`].
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>>;

    async fn create_warehouse(&self, new: CreateWarehouse) -> AppResult<Warehouse>;

    async fn list_locations(&self) -> AppResult<Vec<LocationWithWarehouse>>;

    async fn create_location(&self, new: CreateLocation) -> AppResult<Location>;

    async fn list_items(&self) -> AppResult<Vec<Item>>;

    async fn create_item(&self, new: CreateItem) -> AppResult<Item>;

    async fn list_inventory(&self) -> AppResult<Vec<InventoryDetail>>;

    /// Case-insensitive substring match on sku, name and barcode.
    async fn search_items(&self, query: &str, limit: i64) -> AppResult<Vec<Item>>;

    /// Newest first.
    async fn list_movements(&self, item_id: Option<Uuid>, limit: i64) -> AppResult<Vec<Movement>>;

    async fn summary(&self) -> AppResult<DashboardSummary>;

    /// Adds `qty` to the item's balance at `location_id`, creating the row on
    /// first placement.
    async fn place(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory>;

    /// Removes `qty`, failing with `InsufficientQuantity` when the balance is
    /// missing or short.
    async fn retrieve(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory>;

    /// Debits `from`, credits `to` and records the movement in one unit.
    async fn transfer(&self, item_id: Uuid, from: Uuid, to: Uuid, qty: i64) -> AppResult<Movement>;
}
