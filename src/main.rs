use anyhow::Context;
use clearance::logging::init_tracing;
use clearance::metrics::{init_metrics, metrics_app};
use clearance::router::init_router;
use clearance::state::init_app_state;
use clearance_config::ServerConfig;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();

    if let Some(handle) = init_metrics()? {
        let listener = tokio::net::TcpListener::bind(&server_config.metrics_addr)
            .await
            .with_context(|| format!("failed to bind {}", server_config.metrics_addr))?;
        info!("Metrics available at http://{}/metrics", server_config.metrics_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state().await?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&server_config.addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.addr))?;
    info!("Server running on http://{}", server_config.addr);
    info!("Swagger UI available at http://{}/swagger-ui", server_config.addr);
    info!("Scalar UI available at http://{}/scalar", server_config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
