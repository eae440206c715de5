use fellowship_feeds::app;
use fellowship_feeds::state::{AppConfig, AppState};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    fellowship_feeds::init_tracing();

    tracing::info!("Log initialized");

    let config = AppConfig::from_env();
    tracing::info!("Using feed API: {}", config.feed_api_url);

    let http_client = fellowship_feeds::build_http_client()?;
    let app_state = AppState::new(config.clone(), http_client);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Feed server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let router = app(app_state);
    axum::serve(listener, router).await?;

    Ok(())
}
