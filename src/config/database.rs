//! Database configuration module for the ticket service.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! The `tickets` table is generated from the entity definition with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust model.
//! Creation is idempotent (`IF NOT EXISTS`) because it runs on every startup.

use crate::entities::Ticket;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Database used when `DATABASE_URL` is not set. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tickets.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection pool to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");

    let db = Database::connect(&database_url).await?;
    info!("Database connection established");
    Ok(db)
}

/// Creates the `tickets` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut ticket_table = schema.create_table_from_entity(Ticket);
    ticket_table.if_not_exists();

    db.execute(builder.build(&ticket_table)).await?;
    debug!("Ticket table ready");

    Ok(())
}
