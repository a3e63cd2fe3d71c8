use dotenvy::dotenv;
use soporte_tickets::{
    config::{database, server::load_server_config},
    errors::Result,
    server::run_server,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file so RUST_LOG and DATABASE_URL can come from it
    let dotenv_result = dotenv();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenv_result {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => info!("No .env file loaded ({e}), using process environment"),
    }

    // 3. Load server configuration (config.toml + environment overrides)
    let server_config = load_server_config()
        .inspect_err(|e| error!("Failed to load server configuration: {}", e))?;

    // 4. Connect to the database and make sure the ticket table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Ticket table created or already present."))
        .inspect_err(|e| error!("Failed to create ticket table: {}", e))?;

    // 5. Serve until shutdown
    run_server(server_config, db).await
}
