use anyhow::Context;

use prodtrack_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prodtrack_observability::init();

    let config = ApiConfig::from_env().context("invalid API configuration")?;
    if config.api_token.is_none() {
        tracing::warn!("PRODTRACK_API_TOKEN not set; API accepts unauthenticated requests");
    }

    let app = prodtrack_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
