//! Core business logic, independent of the HTTP layer.

/// Ticket CRUD operations, validation, and status counts
pub mod ticket;
