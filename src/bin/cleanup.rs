//! Empties every application table. Meant for local and test databases.

use tracing::info;
use tracing_subscriber::EnvFilter;

use invite_auth::{config::Config, directory::SurrealDirectory, errors::Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    let directory = SurrealDirectory::connect(&config).await?;
    directory.clean().await?;

    info!(namespace = %config.db_namespace, database = %config.db_name, "database cleaned");
    Ok(())
}
