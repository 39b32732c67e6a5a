use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use super::state::AppState;
use crate::exposition::{render, CONTENT_TYPE};

pub async fn metrics(State(state): State<AppState>) -> Response {
    let _permit = match state.try_acquire() {
        Ok(permit) => permit,
        Err(limit) => {
            state
                .exporter_metrics()
                .record_response(StatusCode::SERVICE_UNAVAILABLE);
            tracing::warn!(limit, "rejecting scrape, too many in flight");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Limit of concurrent requests reached ({limit}), try again later.\n"),
            )
                .into_response();
        }
    };

    let exporter_metrics = state.exporter_metrics();
    let include = state.options().include_exporter_metrics;
    let _in_flight = exporter_metrics.track_in_flight();

    let mut samples = state.collector().collect().await;
    samples.extend(exporter_metrics.samples(include));

    let mut descs = state.collector().describe();
    descs.extend(exporter_metrics.describe(include));

    let body = render(&descs, &samples);
    exporter_metrics.record_response(StatusCode::OK);

    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
