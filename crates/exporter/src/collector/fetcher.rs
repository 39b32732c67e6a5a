use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use nifcloud_nas::{FetchError, MetricStatisticsQuery, NasClient, NasMetricName, QueryWindow};

use super::target::TargetInstance;

/// Trailing window wide enough to hold at least one published data point.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(180);

#[async_trait]
pub trait MetricFetcher: Send + Sync {
    /// Most recent value of `metric` for `target`.
    async fn fetch(&self, metric: NasMetricName, target: &TargetInstance) -> Result<f64, FetchError>;
}

/// Fetches from the NIFCLOUD statistics API.
pub struct NifcloudFetcher {
    client: NasClient,
    window: Duration,
}

impl NifcloudFetcher {
    pub fn new(client: NasClient) -> Self {
        Self {
            client,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }
}

#[async_trait]
impl MetricFetcher for NifcloudFetcher {
    async fn fetch(&self, metric: NasMetricName, target: &TargetInstance) -> Result<f64, FetchError> {
        let window = QueryWindow::trailing(Utc::now(), self.window)?;
        let query = MetricStatisticsQuery::new(metric, target.identifier.as_str(), window)?;
        self.client.fetch_latest(&query).await
    }
}
