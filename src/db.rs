//! Database connection management
//!
//! Wraps SeaORM's connection pool in a clonable handle and exposes a
//! process-wide `DB` facade initialized once at bootstrap. Actions take a
//! `DbConnection` explicitly so tests can run against their own in-memory
//! sqlite database.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::Error;

static CONNECTION: OnceLock<DbConnection> = OnceLock::new();

/// Clonable, thread-safe wrapper around SeaORM's DatabaseConnection
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Establish a connection pool from config
    ///
    /// For file-backed sqlite URLs the database file is created on first
    /// connect if it does not exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        let url = if config.url.starts_with("sqlite://") {
            let path = config.url.trim_start_matches("sqlite://");
            let path = path.trim_start_matches("./");

            if path != ":memory:" && !path.starts_with(":memory:") {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).ok();
                    }
                }
                if !std::path::Path::new(path).exists() {
                    std::fs::File::create(path).ok();
                }
            }

            format!("sqlite:{}?mode=rwc", path)
        } else {
            config.url.clone()
        };

        let mut opt = ConnectOptions::new(&url);
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(config.logging);

        let conn = Database::connect(opt)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(conn),
        })
    }

    /// Get a reference to the underlying SeaORM connection
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl AsRef<DatabaseConnection> for DbConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Database facade holding the process-wide connection
pub struct DB;

impl DB {
    /// Connect and store the global connection (called once from bootstrap)
    pub async fn init(config: DatabaseConfig) -> Result<(), Error> {
        let connection = DbConnection::connect(&config).await?;
        CONNECTION.set(connection).ok();
        Ok(())
    }

    /// Get the global connection
    pub fn get() -> Result<DbConnection, Error> {
        CONNECTION
            .get()
            .cloned()
            .ok_or_else(|| Error::internal("Database not initialized. Call DB::init() first."))
    }

    pub fn is_connected() -> bool {
        CONNECTION.get().is_some()
    }
}
