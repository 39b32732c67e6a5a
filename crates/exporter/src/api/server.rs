use std::future::Future;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use super::health;
use super::metrics;
use super::state::AppState;

pub const HEALTH_PATH: &str = "/healthz";

pub fn router(state: AppState) -> Router {
    let telemetry_path = state.options().telemetry_path.clone();
    let mut app = Router::new()
        .route(HEALTH_PATH, get(health::healthz))
        .route(&telemetry_path, get(metrics::metrics));
    if telemetry_path != "/" {
        app = app.route("/", get(health::landing));
    }
    app.with_state(state)
}

pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
