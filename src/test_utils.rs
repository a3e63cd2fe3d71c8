//! Shared test utilities for the ticket service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test tickets with sensible defaults.

use crate::{
    core::ticket::{self, TicketInput},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with the ticket table initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a complete create/update payload for the given customer.
///
/// # Defaults
/// * `direccion`: "Calle 1"
/// * `telefono`: "555"
/// * `descripcion`: "No enciende"
/// * `tipo_soporte`: "Hardware"
#[must_use]
pub fn ticket_input(cliente: &str) -> TicketInput {
    TicketInput {
        cliente: Some(cliente.to_string()),
        direccion: Some("Calle 1".to_string()),
        telefono: Some("555".to_string()),
        descripcion: Some("No enciende".to_string()),
        tipo_soporte: Some("Hardware".to_string()),
    }
}

/// The reference ticket used across scenarios (customer "Ana").
#[must_use]
pub fn ana_input() -> TicketInput {
    ticket_input("Ana")
}

/// Creates a test ticket with sensible defaults for the given customer.
pub async fn create_test_ticket(
    db: &DatabaseConnection,
    cliente: &str,
) -> Result<entities::ticket::Model> {
    ticket::create_ticket(db, ticket_input(cliente)).await
}
