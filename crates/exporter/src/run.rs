use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use nifcloud_nas::{Credentials, NasClient};
use tokio::net::TcpListener;

use crate::api::{self, AppState, ServeOptions};
use crate::collector::{MetricSet, NasCollector, NifcloudFetcher, TargetInstance};
use crate::config::{parse_listen_address, ExporterConfig};

/// Wires the collector behind the HTTP server built from `config`.
pub fn build_state(config: &ExporterConfig) -> anyhow::Result<AppState> {
    let nifcloud = &config.nifcloud;
    let target = TargetInstance::new(nifcloud.nas_instance_id.as_str(), nifcloud.region.as_str());

    let client = NasClient::new(
        Credentials::new(
            nifcloud.access_key_id.as_str(),
            nifcloud.secret_access_key.as_str(),
        ),
        &target.region,
        nifcloud.endpoint.as_deref(),
    )
    .context("building NIFCLOUD client")?;

    tracing::info!(
        instance = %target.identifier,
        region = %target.region,
        endpoint = %client.endpoint(),
        window_s = config.scrape.window_seconds,
        fetch_timeout_s = ?config.scrape.fetch_timeout_seconds,
        "exporter configured"
    );

    let fetcher = NifcloudFetcher::new(client)
        .with_window(Duration::from_secs(config.scrape.window_seconds));
    let collector = NasCollector::new(Arc::new(fetcher), MetricSet::nas(), target)
        .with_fetch_timeout(config.scrape.fetch_timeout_seconds.map(Duration::from_secs));

    Ok(AppState::new(
        collector,
        ServeOptions {
            telemetry_path: config.web.telemetry_path.clone(),
            max_requests: config.web.max_requests,
            include_exporter_metrics: !config.web.disable_exporter_metrics,
        },
    ))
}

pub async fn run(config: ExporterConfig) -> anyhow::Result<()> {
    let addr = parse_listen_address(&config.web.listen_address)?;
    let state = build_state(&config)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        addr = %addr,
        path = %config.web.telemetry_path,
        max_requests = config.web.max_requests,
        "listening"
    );

    api::serve(listener, state, crate::shutdown::wait_for_shutdown())
        .await
        .context("HTTP server")?;

    tracing::info!("stopped");
    Ok(())
}
