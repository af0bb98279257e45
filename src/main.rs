use anyhow::Context;
use tracing_subscriber::EnvFilter;

use gamecafe::config::{config, log_filter_from_env};
use gamecafe::database::Database;
use gamecafe::{app, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    // Logging first, so warnings raised while loading the config singleton are kept
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(log_filter_from_env()).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config();

    tracing::info!("Starting game café in {:?} mode", config.environment);

    if is_production!() && config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL is required in production");
    }

    let db = Database::from_config(&config.database).await?;
    let app = app(AppState::new(config.clone(), db));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
