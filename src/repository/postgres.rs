use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::Database,
    errors::{AppError, AppResult},
    models::{
        CreateItem, CreateLocation, CreateWarehouse, DashboardSummary, Inventory,
        InventoryDetail, Item, Location, LocationWithWarehouse, Movement, Warehouse,
    },
};

use super::InventoryRepository;

const INVENTORY_COLUMNS: &str = "id, item_id, location_id, quantity, created_at, updated_at";
const MOVEMENT_COLUMNS: &str =
    "id, movement_type, item_id, from_location_id, to_location_id, quantity, created_at";

/// PostgreSQL-backed repository. Balance checks are folded into conditional
/// `UPDATE` statements so the row lock serializes competing debits.
#[derive(Clone)]
pub struct PgRepository {
    db: Database,
}

impl PgRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct LocationRow {
    id: Uuid,
    code: String,
    description: Option<String>,
    warehouse_id: Uuid,
    created_at: DateTime<Utc>,
    warehouse_code: String,
    warehouse_name: String,
    warehouse_address: Option<String>,
    warehouse_created_at: DateTime<Utc>,
}

impl From<LocationRow> for LocationWithWarehouse {
    fn from(row: LocationRow) -> Self {
        Self {
            location: Location {
                id: row.id,
                code: row.code,
                description: row.description,
                warehouse_id: row.warehouse_id,
                created_at: row.created_at,
            },
            warehouse: Warehouse {
                id: row.warehouse_id,
                code: row.warehouse_code,
                name: row.warehouse_name,
                address: row.warehouse_address,
                created_at: row.warehouse_created_at,
            },
        }
    }
}

#[derive(FromRow)]
struct InventoryRow {
    id: Uuid,
    item_id: Uuid,
    location_id: Uuid,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    item_sku: String,
    item_name: String,
    item_barcode: Option<String>,
    item_created_at: DateTime<Utc>,
    location_code: String,
    location_description: Option<String>,
    location_warehouse_id: Uuid,
    location_created_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryDetail {
    fn from(row: InventoryRow) -> Self {
        Self {
            inventory: Inventory {
                id: row.id,
                item_id: row.item_id,
                location_id: row.location_id,
                quantity: row.quantity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            item: Item {
                id: row.item_id,
                sku: row.item_sku,
                name: row.item_name,
                barcode: row.item_barcode,
                created_at: row.item_created_at,
            },
            location: Location {
                id: row.location_id,
                code: row.location_code,
                description: row.location_description,
                warehouse_id: row.location_warehouse_id,
                created_at: row.location_created_at,
            },
        }
    }
}

/// Wraps a search term for `ILIKE`, matching `%`, `_` and `\` literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn credit(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    location_id: Uuid,
    qty: i64,
) -> AppResult<Inventory> {
    let sql = format!(
        r#"
        INSERT INTO inventory (id, item_id, location_id, quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (item_id, location_id)
        DO UPDATE SET quantity = inventory.quantity + EXCLUDED.quantity, updated_at = NOW()
        RETURNING {INVENTORY_COLUMNS}
        "#
    );

    let inventory = sqlx::query_as::<_, Inventory>(&sql)
        .bind(Uuid::new_v4())
        .bind(item_id)
        .bind(location_id)
        .bind(qty)
        .fetch_one(&mut **tx)
        .await?;

    Ok(inventory)
}

// The WHERE clause is the sufficiency check; no row back means the balance is
// absent or too small.
async fn debit(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    location_id: Uuid,
    qty: i64,
) -> AppResult<Inventory> {
    let sql = format!(
        r#"
        UPDATE inventory
        SET quantity = quantity - $3, updated_at = NOW()
        WHERE item_id = $1 AND location_id = $2 AND quantity >= $3
        RETURNING {INVENTORY_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Inventory>(&sql)
        .bind(item_id)
        .bind(location_id)
        .bind(qty)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::InsufficientQuantity)
}

// Opposing transfers touch the same two rows; locking them in location order
// keeps them from waiting on each other. The zero-quantity insert makes sure
// a destination seen for the first time has a row to lock.
async fn lock_pair(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    from: Uuid,
    to: Uuid,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory (id, item_id, location_id, quantity)
        VALUES ($1, $2, $3, 0)
        ON CONFLICT (item_id, location_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(item_id)
    .bind(to)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        SELECT id FROM inventory
        WHERE item_id = $1 AND location_id = ANY($2)
        ORDER BY location_id
        FOR UPDATE
        "#,
    )
    .bind(item_id)
    .bind(vec![from, to])
    .fetch_all(&mut **tx)
    .await?;

    Ok(())
}

async fn record(tx: &mut Transaction<'_, Postgres>, movement: Movement) -> AppResult<Movement> {
    let sql = format!(
        r#"
        INSERT INTO movements (id, movement_type, item_id, from_location_id, to_location_id, quantity, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {MOVEMENT_COLUMNS}
        "#
    );

    let movement = sqlx::query_as::<_, Movement>(&sql)
        .bind(movement.id)
        .bind(movement.movement_type.as_str())
        .bind(movement.item_id)
        .bind(movement.from_location_id)
        .bind(movement.to_location_id)
        .bind(movement.quantity)
        .bind(movement.created_at)
        .fetch_one(&mut **tx)
        .await?;

    Ok(movement)
}

#[async_trait]
impl InventoryRepository for PgRepository {
    async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            "SELECT id, code, name, address, created_at FROM warehouses ORDER BY code",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    async fn create_warehouse(&self, new: CreateWarehouse) -> AppResult<Warehouse> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (id, code, name, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, name, address, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.code)
        .bind(&new.name)
        .bind(&new.address)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    async fn list_locations(&self) -> AppResult<Vec<LocationWithWarehouse>> {
        let locations = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT
                l.id, l.code, l.description, l.warehouse_id, l.created_at,
                w.code AS warehouse_code,
                w.name AS warehouse_name,
                w.address AS warehouse_address,
                w.created_at AS warehouse_created_at
            FROM locations l
            JOIN warehouses w ON l.warehouse_id = w.id
            ORDER BY w.code, l.code
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(LocationWithWarehouse::from)
        .collect();

        Ok(locations)
    }

    async fn create_location(&self, new: CreateLocation) -> AppResult<Location> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, code, description, warehouse_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, description, warehouse_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.code)
        .bind(&new.description)
        .bind(new.warehouse_id)
        .fetch_one(&self.db)
        .await?;

        Ok(location)
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, sku, name, barcode, created_at FROM items ORDER BY sku",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn create_item(&self, new: CreateItem) -> AppResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, sku, name, barcode)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sku, name, barcode, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.sku)
        .bind(&new.name)
        .bind(&new.barcode)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    async fn list_inventory(&self) -> AppResult<Vec<InventoryDetail>> {
        let inventory = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT
                inv.id, inv.item_id, inv.location_id, inv.quantity, inv.created_at, inv.updated_at,
                it.sku AS item_sku,
                it.name AS item_name,
                it.barcode AS item_barcode,
                it.created_at AS item_created_at,
                l.code AS location_code,
                l.description AS location_description,
                l.warehouse_id AS location_warehouse_id,
                l.created_at AS location_created_at
            FROM inventory inv
            JOIN items it ON inv.item_id = it.id
            JOIN locations l ON inv.location_id = l.id
            ORDER BY it.sku, l.code
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(InventoryDetail::from)
        .collect();

        Ok(inventory)
    }

    async fn search_items(&self, query: &str, limit: i64) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, sku, name, barcode, created_at
            FROM items
            WHERE sku ILIKE $1 OR name ILIKE $1 OR barcode ILIKE $1
            ORDER BY sku
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn list_movements(&self, item_id: Option<Uuid>, limit: i64) -> AppResult<Vec<Movement>> {
        let sql = format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM movements
            WHERE $1::uuid IS NULL OR item_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            "#
        );

        let movements = sqlx::query_as::<_, Movement>(&sql)
            .bind(item_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(movements)
    }

    async fn summary(&self) -> AppResult<DashboardSummary> {
        let summary = sqlx::query_as::<_, DashboardSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items) AS total_skus,
                (SELECT COUNT(*) FROM locations) AS total_locations,
                (SELECT LEAST(COALESCE(SUM(quantity), 0), 9223372036854775807)::BIGINT FROM inventory) AS total_quantity
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(summary)
    }

    async fn place(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory> {
        let mut tx = self.db.begin().await?;
        let inventory = credit(&mut tx, item_id, location_id, qty).await?;
        record(&mut tx, Movement::placement(item_id, location_id, qty)).await?;
        tx.commit().await?;

        Ok(inventory)
    }

    async fn retrieve(&self, item_id: Uuid, location_id: Uuid, qty: i64) -> AppResult<Inventory> {
        let mut tx = self.db.begin().await?;
        let inventory = debit(&mut tx, item_id, location_id, qty).await?;
        record(&mut tx, Movement::retrieval(item_id, location_id, qty)).await?;
        tx.commit().await?;

        Ok(inventory)
    }

    async fn transfer(&self, item_id: Uuid, from: Uuid, to: Uuid, qty: i64) -> AppResult<Movement> {
        // Dropping `tx` on any early return rolls back the debit.
        let mut tx = self.db.begin().await?;
        lock_pair(&mut tx, item_id, from, to).await?;
        debit(&mut tx, item_id, from, qty).await?;
        credit(&mut tx, item_id, to, qty).await?;
        let movement = record(&mut tx, Movement::transfer(item_id, from, to, qty)).await?;
        tx.commit().await?;

        Ok(movement)
    }
}
