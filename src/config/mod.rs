/// Database configuration and connection management
pub mod database;

/// Server settings loaded from config.toml and environment overrides
pub mod server;
