use anyhow::Result;
use tracing::{info, warn};
use wattmap::{api, config::Config, dashboard::AppState, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let app_state = AppState::new(cfg.clone())?;
    let app = api::router(app_state);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - the dashboard will be reachable from the network");
    }

    info!(%addr, predictor = %cfg.predictor.url, "starting WattMap dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
