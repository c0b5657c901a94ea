use std::{error::Error, sync::Arc};
use dotenvy::dotenv;

use rackledger::{
    config::Config,
    create_router,
    database::{create_database_pool, run_migrations, seed_demo_data},
    ledger::InventoryService,
    repository::PgRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = Config::from_env()?;

    // Initialize database
    let db = create_database_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&db).await?;

    if config.seed_demo_data {
        seed_demo_data(&db).await?;
    }

    let ledger = InventoryService::new(Arc::new(PgRepository::new(db)));
    let app = create_router(ledger, config.static_dir.as_deref());

    let addr = config.bind_addr();
    log::info!("rackledger listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
