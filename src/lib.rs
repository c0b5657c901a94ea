pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod repository;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use ledger::InventoryService;

pub fn create_router(ledger: InventoryService, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/dashboard", get(handlers::dashboard))

        // Master data
        .route(
            "/api/warehouses",
            get(handlers::warehouses::warehouses_list).post(handlers::warehouses::create_warehouse),
        )
        .route(
            "/api/locations",
            get(handlers::locations::locations_list).post(handlers::locations::create_location),
        )
        .route(
            "/api/items",
            get(handlers::items::items_list).post(handlers::items::create_item),
        )
        .route("/api/search", get(handlers::items::search))

        // Ledger
        .route("/api/inventory", get(handlers::inventory::inventory_list))
        .route("/api/movements", get(handlers::inventory::movements_list))
        .route("/api/placement", post(handlers::inventory::placement))
        .route("/api/retrieval", post(handlers::inventory::retrieval))
        .route("/api/transfer", post(handlers::inventory::transfer));

    // Pre-built front end, if one is deployed next to the API
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
        )
        .with_state(ledger)
}
