use std::sync::Arc;
use uuid::Uuid;

use rackledger::{
    database::{create_database_pool, run_migrations},
    errors::AppError,
    ledger::InventoryService,
    models::{CreateItem, CreateLocation, CreateWarehouse, PlacementRequest, RetrievalRequest, TransferRequest},
    repository::PgRepository,
};

// These tests need a disposable Postgres database.
// Run with: DATABASE_URL=postgres://... cargo test --test postgres_test -- --ignored
async fn ledger() -> InventoryService {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = create_database_pool(&url, 20).await.expect("db connect");
    run_migrations(&db).await.expect("migrations");
    InventoryService::new(Arc::new(PgRepository::new(db)))
}

async fn fixture(ledger: &InventoryService) -> (Uuid, Uuid, Uuid) {
    let suffix = Uuid::new_v4().simple().to_string();
    let warehouse = ledger
        .create_warehouse(CreateWarehouse { code: format!("WH-{}", suffix), name: "Test".into(), address: None })
        .await
        .expect("warehouse");
    let l1 = ledger
        .create_location(CreateLocation { code: "L1".into(), description: None, warehouse_id: warehouse.id })
        .await
        .expect("l1");
    let l2 = ledger
        .create_location(CreateLocation { code: "L2".into(), description: None, warehouse_id: warehouse.id })
        .await
        .expect("l2");
    let item = ledger
        .create_item(CreateItem { sku: format!("SKU-{}", suffix), name: "Test item".into(), barcode: None })
        .await
        .expect("item");
    (item.id, l1.id, l2.id)
}

#[tokio::test]
#[ignore]
async fn concurrent_retrievals_never_overdraw() {
    let ledger = ledger().await;
    let (item, l1, _) = fixture(&ledger).await;
    ledger
        .place(PlacementRequest { item_id: item, location_id: l1, qty: 10 })
        .await
        .expect("seed placement");

    let mut tasks = vec![];
    for _ in 0..20 {
        let ledger = ledger.clone();
        tasks.push(tokio::spawn(async move {
            ledger
                .retrieve(RetrievalRequest { item_id: item, location_id: l1, qty: 1 })
                .await
                .is_ok()
        }));
    }
    let mut success = 0;
    for t in tasks {
        if t.await.unwrap_or(false) {
            success += 1;
        }
    }

    assert_eq!(success, 10, "exactly 10 retrievals should succeed; got {}", success);
}

#[tokio::test]
#[ignore]
async fn failed_transfer_rolls_back_the_debit() {
    let ledger = ledger().await;
    let (item, l1, l2) = fixture(&ledger).await;
    ledger
        .place(PlacementRequest { item_id: item, location_id: l1, qty: 5 })
        .await
        .expect("seed placement");

    let err = ledger
        .transfer(TransferRequest { item_id: item, from_location_id: l1, to_location_id: Uuid::new_v4(), qty: 5 })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    ledger
        .transfer(TransferRequest { item_id: item, from_location_id: l1, to_location_id: l2, qty: 5 })
        .await
        .expect("full balance still available");
}

#[tokio::test]
#[ignore]
async fn opposing_transfers_do_not_deadlock() {
    let ledger = ledger().await;
    let (item, l1, l2) = fixture(&ledger).await;
    for location in [l1, l2] {
        ledger
            .place(PlacementRequest { item_id: item, location_id: location, qty: 1000 })
            .await
            .expect("seed placement");
    }

    let mut tasks = vec![];
    for n in 0..40 {
        let ledger = ledger.clone();
        let (from, to) = if n % 2 == 0 { (l1, l2) } else { (l2, l1) };
        tasks.push(tokio::spawn(async move {
            ledger
                .transfer(TransferRequest { item_id: item, from_location_id: from, to_location_id: to, qty: 1 })
                .await
        }));
    }
    let mut failures = vec![];
    for t in tasks {
        if let Err(err) = t.await.expect("task") {
            failures.push(err.to_string());
        }
    }
    assert!(failures.is_empty(), "transfers failed: {:?}", failures);

    let total: i64 = ledger
        .inventory()
        .await
        .expect("inventory")
        .into_iter()
        .filter(|row| row.inventory.item_id == item)
        .map(|row| row.inventory.quantity)
        .sum();
    assert_eq!(total, 2000);
}

#[tokio::test]
#[ignore]
async fn transfer_to_new_location_creates_its_balance() {
    let ledger = ledger().await;
    let (item, l1, l2) = fixture(&ledger).await;
    ledger
        .place(PlacementRequest { item_id: item, location_id: l1, qty: 8 })
        .await
        .expect("seed placement");

    ledger
        .transfer(TransferRequest { item_id: item, from_location_id: l1, to_location_id: l2, qty: 3 })
        .await
        .expect("transfer");

    let balances: Vec<(uuid::Uuid, i64)> = ledger
        .inventory()
        .await
        .expect("inventory")
        .into_iter()
        .filter(|row| row.inventory.item_id == item)
        .map(|row| (row.inventory.location_id, row.inventory.quantity))
        .collect();
    assert!(balances.contains(&(l1, 5)));
    assert!(balances.contains(&(l2, 3)));
}

#[tokio::test]
#[ignore]
async fn summary_total_saturates_on_huge_balances() {
    let ledger = ledger().await;
    let (item, l1, l2) = fixture(&ledger).await;
    ledger
        .place(PlacementRequest { item_id: item, location_id: l1, qty: i64::MAX })
        .await
        .expect("max placement");
    ledger
        .place(PlacementRequest { item_id: item, location_id: l2, qty: 1 })
        .await
        .expect("one more");

    let summary = ledger.summary().await.expect("summary is a read and must not fail");
    assert_eq!(summary.total_quantity, i64::MAX);
}
