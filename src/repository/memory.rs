use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::{
        CreateItem, CreateLocation, CreateWarehouse, DashboardSummary, Inventory,
        InventoryDetail, Item, Location, LocationWithWarehouse, Movement, Warehouse,
    },
};

use super::InventoryRepository;

#[derive(Default)]
struct State {
    warehouses: Vec<Warehouse>,
    locations: Vec<Location>,
    items: Vec<Item>,
    inventory: HashMap<(Uuid, Uuid), Inventory>,
    movements: Vec<Movement>,
}

impl State {
    fn require_item(&self, id: Uuid) -> AppResult<&Item> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    fn require_location(&self, id: Uuid) -> AppResult<&Location> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    fn credited(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory> {
        let now = Utc::now();
        match self.inventory.get(&(item_id, location_id)) {
            Some(existing) => {
                let quantity = existing
                    .quantity
                    .checked_add(qty)
                    .ok_or_else(|| AppError::Validation("Quantity out of range".to_string()))?;
                Ok(Inventory { quantity, updated_at: now, ..existing.clone() })
            }
            None => Ok(Inventory {
                id: Uuid::new_v4(),
                item_id,
                location_id,
                quantity: qty,
                created_at: now,
                updated_at: now,
            }),
        }
    }

    fn debited(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory> {
        match self.inventory.get(&(item_id, location_id)) {
            Some(existing) if existing.quantity >= qty => Ok(Inventory {
                quantity: existing.quantity - qty,
                updated_at: Utc::now(),
                ..existing.clone()
            }),
            _ => Err(AppError::InsufficientQuantity),
        }
    }

    fn store(&mut self, inventory: Inventory) {
        self.inventory
            .insert((inventory.item_id, inventory.location_id), inventory);
    }
}

/// Process-local repository used by the test suite and for trying the API
/// without a database. Nothing survives a restart.
///
/// Every mutation computes its new rows first and only writes them once all
/// checks have passed, so a failed operation leaves the state untouched.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for MemoryRepository {
    async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let state = self.state.lock().await;
        let mut warehouses = state.warehouses.clone();
        warehouses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(warehouses)
    }

    async fn create_warehouse(&self, new: CreateWarehouse) -> AppResult<Warehouse> {
        let mut state = self.state.lock().await;
        if state.warehouses.iter().any(|w| w.code == new.code) {
            return Err(AppError::Conflict("Warehouse with this code".to_string()));
        }

        let warehouse = Warehouse {
            id: Uuid::new_v4(),
            code: new.code,
            name: new.name,
            address: new.address,
            created_at: Utc::now(),
        };
        state.warehouses.push(warehouse.clone());
        Ok(warehouse)
    }

    async fn list_locations(&self) -> AppResult<Vec<LocationWithWarehouse>> {
        let state = self.state.lock().await;
        let mut locations: Vec<LocationWithWarehouse> = state
            .locations
            .iter()
            .filter_map(|location| {
                let warehouse = state.warehouses.iter().find(|w| w.id == location.warehouse_id)?;
                Some(LocationWithWarehouse {
                    location: location.clone(),
                    warehouse: warehouse.clone(),
                })
            })
            .collect();
        locations.sort_by(|a, b| {
            (&a.warehouse.code, &a.location.code).cmp(&(&b.warehouse.code, &b.location.code))
        });
        Ok(locations)
    }

    async fn create_location(&self, new: CreateLocation) -> AppResult<Location> {
        let mut state = self.state.lock().await;
        if !state.warehouses.iter().any(|w| w.id == new.warehouse_id) {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }
        if state
            .locations
            .iter()
            .any(|l| l.code == new.code && l.warehouse_id == new.warehouse_id)
        {
            return Err(AppError::Conflict(
                "Location with this code in the warehouse".to_string(),
            ));
        }

        let location = Location {
            id: Uuid::new_v4(),
            code: new.code,
            description: new.description,
            warehouse_id: new.warehouse_id,
            created_at: Utc::now(),
        };
        state.locations.push(location.clone());
        Ok(location)
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let state = self.state.lock().await;
        let mut items = state.items.clone();
        items.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(items)
    }

    async fn create_item(&self, new: CreateItem) -> AppResult<Item> {
        let mut state = self.state.lock().await;
        if state.items.iter().any(|i| i.sku == new.sku) {
            return Err(AppError::Conflict("Item with this SKU".to_string()));
        }

        let item = Item {
            id: Uuid::new_v4(),
            sku: new.sku,
            name: new.name,
            barcode: new.barcode,
            created_at: Utc::now(),
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn list_inventory(&self) -> AppResult<Vec<InventoryDetail>> {
        let state = self.state.lock().await;
        let mut inventory = state
            .inventory
            .values()
            .map(|row| -> AppResult<InventoryDetail> {
                Ok(InventoryDetail {
                    inventory: row.clone(),
                    item: state.require_item(row.item_id)?.clone(),
                    location: state.require_location(row.location_id)?.clone(),
                })
            })
            .collect::<AppResult<Vec<InventoryDetail>>>()?;
        inventory.sort_by(|a, b| (&a.item.sku, &a.location.code).cmp(&(&b.item.sku, &b.location.code)));
        Ok(inventory)
    }

    async fn search_items(&self, query: &str, limit: i64) -> AppResult<Vec<Item>> {
        let needle = query.to_lowercase();
        let matches = |value: &str| value.to_lowercase().contains(&needle);

        let state = self.state.lock().await;
        let mut items: Vec<Item> = state
            .items
            .iter()
            .filter(|i| matches(&i.sku) || matches(&i.name) || i.barcode.as_deref().is_some_and(matches))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.sku.cmp(&b.sku));
        items.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(items)
    }

    async fn list_movements(&self, item_id: Option<Uuid>, limit: i64) -> AppResult<Vec<Movement>> {
        let state = self.state.lock().await;
        let movements = state
            .movements
            .iter()
            .rev()
            .filter(|m| item_id.map_or(true, |id| m.item_id == id))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect();
        Ok(movements)
    }

    async fn summary(&self) -> AppResult<DashboardSummary> {
        let state = self.state.lock().await;
        Ok(DashboardSummary {
            total_skus: state.items.len() as i64,
            total_locations: state.locations.len() as i64,
            total_quantity: state
                .inventory
                .values()
                .fold(0i64, |total, i| total.saturating_add(i.quantity)),
        })
    }

    async fn place(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory> {
        let mut state = self.state.lock().await;
        state.require_item(item_id)?;
        state.require_location(location_id)?;

        let inventory = state.credited(item_id, location_id, qty)?;
        state.store(inventory.clone());
        state.movements.push(Movement::placement(item_id, location_id, qty));
        Ok(inventory)
    }

    async fn retrieve(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory> {
        let mut state = self.state.lock().await;
        let inventory = state.debited(item_id, location_id, qty)?;
        state.store(inventory.clone());
        state.movements.push(Movement::retrieval(item_id, location_id, qty));
        Ok(inventory)
    }

    async fn transfer(&self, item_id: Uuid, from: Uuid, to: Uuid, qty: i64) -> AppResult<Movement> {
        let mut state = self.state.lock().await;
        let source = state.debited(item_id, from, qty)?;
        state.require_location(to)?;
        let destination = state.credited(item_id, to, qty)?;

        let movement = Movement::transfer(item_id, from, to, qty);
        state.store(source);
        state.store(destination);
        state.movements.push(movement.clone());
        Ok(movement)
    }
}
