//! Migration runner
//!
//! Usage:
//!   cargo run --bin migrate           - Run all pending migrations
//!   cargo run --bin migrate rollback  - Rollback the last migration
//!   cargo run --bin migrate status    - Show migration status
//!   cargo run --bin migrate fresh     - Drop all tables and re-run migrations

use sea_orm_migration::prelude::*;
use std::env;

use taskdeck::config::DatabaseConfig;
use taskdeck::db::DbConnection;
use taskdeck::migrations::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db = DbConnection::connect(&DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to database");

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("up");

    match command {
        "up" | "migrate" => {
            println!("Running migrations...");
            Migrator::up(db.inner(), None)
                .await
                .expect("Failed to run migrations");
            println!("Migrations completed successfully!");
        }
        "down" | "rollback" => {
            let steps: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);
            println!("Rolling back {} migration(s)...", steps);
            Migrator::down(db.inner(), Some(steps))
                .await
                .expect("Failed to rollback");
            println!("Rollback completed successfully!");
        }
        "status" => {
            println!("Migration status:");
            Migrator::status(db.inner())
                .await
                .expect("Failed to get status");
        }
        "fresh" => {
            println!("WARNING: Dropping all tables and re-running migrations...");
            Migrator::fresh(db.inner())
                .await
                .expect("Failed to refresh database");
            println!("Database refreshed successfully!");
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!("Usage: migrate [up|rollback|status|fresh]");
            std::process::exit(1);
        }
    }
}
