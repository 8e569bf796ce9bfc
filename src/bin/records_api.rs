//! Patient-records service binary.

use std::sync::{Arc, Mutex};

use healthcare_copilot::api::{records_router, serve, RecordsApiContext};
use healthcare_copilot::config::ServiceConfig;
use healthcare_copilot::db::sqlite::open_database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    healthcare_copilot::init_tracing();
    let config = ServiceConfig::from_env();

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = open_database(&config.database_path)?;
    let ctx = RecordsApiContext {
        db: Arc::new(Mutex::new(conn)),
    };

    let router = records_router(ctx, config.signer());
    serve(router, config.records_addr).await?;
    Ok(())
}
