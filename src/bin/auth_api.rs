//! Authentication service binary.

use std::sync::{Arc, Mutex};

use healthcare_copilot::api::{auth_router, serve, AuthApiContext};
use healthcare_copilot::auth::AuthService;
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
    let ctx = AuthApiContext {
        db: Arc::new(Mutex::new(conn)),
        auth: AuthService::new(config.signer()),
    };

    let router = auth_router(ctx, config.signer());
    serve(router, config.auth_addr).await?;
    Ok(())
}
