pub mod warehouse;
pub mod location;
pub mod item;
pub mod inventory;
pub mod movement;

pub use warehouse::{Warehouse, CreateWarehouse};
pub use location::{Location, LocationWithWarehouse, CreateLocation};
pub use item::{Item, CreateItem, SearchQuery};
pub use inventory::{
    Inventory, InventoryDetail, DashboardSummary,
    PlacementRequest, RetrievalRequest, TransferRequest,
};
pub use movement::{Movement, MovementType, MovementQuery};
