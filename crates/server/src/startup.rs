use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use service::installer::ProcessRunner;
use service::registry::RedisRegistryStore;
use tracing::info;

use crate::routes;
use crate::state::ServerState;

/// Build the app against Redis and the real helm binary and serve until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let redis_url = cfg.redis.url();
    let store = RedisRegistryStore::new(&redis_url)?;
    info!(redis = %redis_url, helm_host = %cfg.helm.host, "registry and installer configured");

    let state = ServerState::new(Arc::new(store), Arc::new(ProcessRunner), &cfg);
    let app: Router = routes::build_router(state);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "starting helm broker");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}
