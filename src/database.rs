use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use uuid::Uuid;

pub type Database = Pool<Postgres>;

pub async fn create_database_pool(database_url: &str, max_connections: u32) -> Result<Database, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await?;

    log::info!("Connected to database successfully");
    Ok(pool)
}

pub async fn run_migrations(db: &Database) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(db).await?;
    log::info!("Database migrations applied");
    Ok(())
}

/// Inserts the demo warehouses, locations, items and opening balances.
/// Safe to run repeatedly: existing rows are reused and the opening
/// balances are reset. No movements are written.
pub async fn seed_demo_data(db: &Database) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;

    let wh_a = upsert_warehouse(&mut tx, "WH-A", "Warehouse A").await?;
    let wh_b = upsert_warehouse(&mut tx, "WH-B", "Warehouse B").await?;

    let l1 = upsert_location(&mut tx, "R1-A1-01", wh_a, Some("Row 1 Aisle 1 Bin 01")).await?;
    let l2 = upsert_location(&mut tx, "R1-A1-02", wh_a, None).await?;
    upsert_location(&mut tx, "R2-B1-01", wh_b, None).await?;

    let it1 = upsert_item(&mut tx, "SKU-001", "Sample Item 1", Some("1234567890123")).await?;
    let it2 = upsert_item(&mut tx, "SKU-002", "Sample Item 2", None).await?;

    set_balance(&mut tx, it1, l1, 50).await?;
    set_balance(&mut tx, it2, l2, 20).await?;

    tx.commit().await?;
    log::info!("Demo data seeded");
    Ok(())
}

type Tx<'a> = sqlx::Transaction<'a, Postgres>;

// `DO UPDATE SET code = EXCLUDED.code` is a no-op that still lets RETURNING
// hand back the existing id.
async fn upsert_warehouse(tx: &mut Tx<'_>, code: &str, name: &str) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO warehouses (id, code, name) VALUES ($1, $2, $3)
        ON CONFLICT (code) DO UPDATE SET code = EXCLUDED.code
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(code)
    .bind(name)
    .fetch_one(&mut **tx)
    .await
}

async fn upsert_location(
    tx: &mut Tx<'_>,
    code: &str,
    warehouse_id: Uuid,
    description: Option<&str>,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO locations (id, code, description, warehouse_id) VALUES ($1, $2, $3, $4)
        ON CONFLICT (code, warehouse_id) DO UPDATE SET code = EXCLUDED.code
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(code)
    .bind(description)
    .bind(warehouse_id)
    .fetch_one(&mut **tx)
    .await
}

async fn upsert_item(tx: &mut Tx<'_>, sku: &str, name: &str, barcode: Option<&str>) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO items (id, sku, name, barcode) VALUES ($1, $2, $3, $4)
        ON CONFLICT (sku) DO UPDATE SET sku = EXCLUDED.sku
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(sku)
    .bind(name)
    .bind(barcode)
    .fetch_one(&mut **tx)
    .await
}

async fn set_balance(tx: &mut Tx<'_>, item_id: Uuid, location_id: Uuid, quantity: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO inventory (id, item_id, location_id, quantity) VALUES ($1, $2, $3, $4)
        ON CONFLICT (item_id, location_id) DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(item_id)
    .bind(location_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
