use std::sync::Arc;

use anyhow::Context;

use novelfinder_api::app::{self, services::AppServices};
use novelfinder_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    novelfinder_observability::init(config.log_format);
    config.log_summary();

    let services = AppServices::from_config(&config.store)
        .await
        .context("failed to initialize catalog store")?;
    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
