use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use invite_auth::{app, config::Config, errors::Result, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    let missing = config.missing_secrets();
    if !missing.is_empty() {
        warn!(?missing, "starting without some settings; affected routes will fail");
    }

    let state = AppState::init(&config).await?;

    info!("Starting server");

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Serving auth at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
