//! Trattoria ordering API entry point.
//!
//! # Purpose
//! Wires configuration, storage, signing keys, and the HTTP router, then
//! serves the API alongside the Prometheus metrics listener.
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use trattoria_api::app::{AppState, build_router};
use trattoria_api::auth::keys::{generate_signing_keys, signing_keys_from_seed};
use trattoria_api::auth::session::ensure_admin;
use trattoria_api::config::ApiConfig;
use trattoria_api::observability;
use trattoria_api::store::RestaurantStore;
use trattoria_api::store::memory::InMemoryStore;
use trattoria_authz::Authorizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env_or_yaml().context("api config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("trattoria-api")?;
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "trattoria api listening");
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &ApiConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn RestaurantStore + Send + Sync> = Arc::new(InMemoryStore::new());
    let signing_keys = match config.signing_seed {
        Some(seed) => signing_keys_from_seed(seed),
        None => {
            tracing::warn!("no signing seed configured; sessions end on restart");
            generate_signing_keys()
        }
    };
    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(store.as_ref(), &admin.email, &admin.password).await?;
    }
    Ok(AppState {
        api_version: "v1".to_string(),
        store,
        authorizer: Arc::new(Authorizer::standard()),
        signing_keys: Arc::new(signing_keys),
        token_ttl: Duration::from_secs(config.token_ttl_secs),
        token_leeway_secs: config.token_leeway_secs,
        default_page_size: config.default_page_size,
    })
}
