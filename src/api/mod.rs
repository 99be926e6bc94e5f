pub mod error;
pub mod health;
pub mod pages;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::dashboard::AppState;

/// `/submit` sits outside the request timeout: a prediction runs until the
/// transport gives up, and that failure is rendered inline.
pub fn router(state: AppState) -> Router {
    let max_upload = state.cfg.server.max_upload_bytes;
    let timeout = Duration::from_secs(state.cfg.server.request_timeout_secs);

    let bounded = Router::new()
        .route("/", get(pages::index))
        .route("/upload", post(pages::upload))
        .route("/result", get(pages::show_result))
        .route("/result/download", get(pages::download_result))
        .route("/navigate/predict", post(pages::navigate_predict))
        .route("/healthz", get(health::healthz))
        .layer(TimeoutLayer::new(timeout));

    Router::new()
        .route("/submit", post(pages::submit))
        .merge(bounded)
        .with_state(state)
        .layer(middleware::from_fn(session::session_middleware))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload)))
        .layer(TraceLayer::new_for_http())
}
