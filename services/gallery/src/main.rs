//! School gallery HTTP service entry point.
//!
//! # Purpose
//! Loads configuration, wires the store and upload directory into the gallery
//! service, and serves the API plus the Prometheus metrics listener until
//! Ctrl-C.
use gallery::app::{build_router, build_state};
use gallery::config::GalleryConfig;
use gallery::observability;
use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GalleryConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: GalleryConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("gallery");
    let state = build_state(&config).await?;
    tracing::info!(
        backend = state.service.store().backend_name(),
        data_file = %config.data_file.display(),
        upload_dir = %config.upload_dir.display(),
        admin = config.admin,
        "gallery state ready"
    );
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "gallery listening");
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
