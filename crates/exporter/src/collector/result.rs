use std::time::Duration;

use nifcloud_nas::FetchError;

use super::definitions::{MetricDefinition, MetricSet};
use super::target::TargetInstance;
use crate::exposition::Sample;

/// Outcome of one metric's fetch within a single pass.
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub metric: MetricDefinition,
    pub outcome: Result<f64, FetchError>,
    pub duration: Duration,
}

impl ScrapeResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The value gauge on success, then duration and success meta gauges.
    pub fn into_samples(self, set: &MetricSet, target: &TargetInstance) -> Vec<Sample> {
        let name = self.metric.name.as_str().to_string();
        let mut samples = Vec::with_capacity(3);

        if let Ok(value) = self.outcome {
            samples.push(Sample::new(&self.metric.desc, value, target.label_values()));
        }
        samples.push(Sample::new(
            set.scrape_duration(),
            self.duration.as_secs_f64(),
            vec![name.clone()],
        ));
        samples.push(Sample::new(
            set.scrape_success(),
            if self.outcome.is_ok() { 1.0 } else { 0.0 },
            vec![name],
        ));
        samples
    }
}
