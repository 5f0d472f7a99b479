//! Application bootstrap
//!
//! Loads the environment, wires up tracing, connects the database, and
//! registers global middleware. Called from main.rs before the server
//! starts.

use tracing_subscriber::EnvFilter;

use crate::config::DatabaseConfig;
use crate::db::DB;
use crate::middleware::{register_global_middleware, RequestLogMiddleware};

pub async fn register() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    DB::init(DatabaseConfig::from_env()).await?;

    register_global_middleware(RequestLogMiddleware);

    Ok(())
}
