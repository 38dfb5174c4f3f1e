//! Bootstrap binary: initializes logging, loads the environment, connects to
//! the database, and ensures the schema exists. The engine itself is consumed
//! as a library by whatever hosts the agreement editing workflow.

use dotenvy::dotenv;
use retainer_ledger::config::database;
use retainer_ledger::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and ensure the schema exists
    let database_url = database::get_database_url()?;
    info!(%database_url, "Connecting to database.");
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!("Database initialized, retainer ledger ready.");

    Ok(())
}
