use std::sync::Arc;
use std::time::{Duration, Instant};

use nifcloud_nas::FetchError;
use tokio::sync::mpsc;

use super::definitions::{MetricDefinition, MetricSet};
use super::fetcher::MetricFetcher;
use super::result::ScrapeResult;
use super::target::TargetInstance;
use crate::exposition::{Desc, Sample};

/// Scrapes every tracked NAS statistic, one task per metric.
pub struct NasCollector {
    fetcher: Arc<dyn MetricFetcher>,
    metrics: Arc<MetricSet>,
    target: Arc<TargetInstance>,
    fetch_timeout: Option<Duration>,
}

impl NasCollector {
    pub fn new(
        fetcher: Arc<dyn MetricFetcher>,
        metrics: Arc<MetricSet>,
        target: TargetInstance,
    ) -> Self {
        Self {
            fetcher,
            metrics,
            target: Arc::new(target),
            fetch_timeout: None,
        }
    }

    /// Caps each individual fetch. `None` waits as long as the transport does.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn target(&self) -> &TargetInstance {
        &self.target
    }

    pub fn metric_set(&self) -> &Arc<MetricSet> {
        &self.metrics
    }

    pub fn describe(&self) -> Vec<Arc<Desc>> {
        self.metrics.describe()
    }

    /// Runs one full pass, writing every sample into `sink`.
    ///
    /// Returns only after every per-metric task has finished. Each metric
    /// always yields its duration and success gauges.
    pub async fn collect_into(&self, sink: mpsc::UnboundedSender<Sample>) {
        let pass_start = Instant::now();
        let mut handles = Vec::with_capacity(self.metrics.metrics().len());

        for metric in self.metrics.metrics() {
            let fetcher = self.fetcher.clone();
            let metrics = self.metrics.clone();
            let target = self.target.clone();
            let sink = sink.clone();
            let timeout = self.fetch_timeout;
            let task_metric = metric.clone();

            let handle = tokio::spawn(async move {
                let result = scrape(fetcher.as_ref(), task_metric, &target, timeout).await;
                for sample in result.into_samples(&metrics, &target) {
                    let _ = sink.send(sample);
                }
            });
            handles.push((metric.clone(), handle));
        }

        for (metric, handle) in handles {
            if let Err(e) = handle.await {
                tracing::error!(metric = %metric.name, error = %e, "scrape task aborted");
                let result = ScrapeResult {
                    metric,
                    outcome: Err(FetchError::transport(format!("scrape task aborted: {e}"))),
                    duration: pass_start.elapsed(),
                };
                for sample in result.into_samples(&self.metrics, &self.target) {
                    let _ = sink.send(sample);
                }
            }
        }
    }

    pub async fn collect(&self) -> Vec<Sample> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.collect_into(tx).await;

        let mut samples = Vec::with_capacity(self.metrics.metrics().len() * 3);
        while let Some(sample) = rx.recv().await {
            samples.push(sample);
        }
        samples
    }
}

async fn scrape(
    fetcher: &dyn MetricFetcher,
    metric: MetricDefinition,
    target: &TargetInstance,
    timeout: Option<Duration>,
) -> ScrapeResult {
    let begin = Instant::now();
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(metric.name, target))
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::transport(format!(
                    "no response within {:.3}s",
                    limit.as_secs_f64()
                )))
            }),
        None => fetcher.fetch(metric.name, target).await,
    };
    let duration = begin.elapsed();

    match &outcome {
        Ok(value) => tracing::debug!(
            metric = %metric.name,
            duration_seconds = duration.as_secs_f64(),
            value,
            "scrape succeeded"
        ),
        Err(e) => tracing::error!(
            metric = %metric.name,
            duration_seconds = duration.as_secs_f64(),
            kind = %e.kind(),
            error = %e,
            "scrape failed"
        ),
    }

    ScrapeResult {
        metric,
        outcome,
        duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nifcloud_nas::NasMetricName;
    use std::collections::{HashMap, HashSet};

    struct StubFetcher {
        plan: HashMap<NasMetricName, (Duration, Result<f64, FetchError>)>,
        fallback: Result<f64, FetchError>,
    }

    impl StubFetcher {
        fn always(outcome: Result<f64, FetchError>) -> Self {
            Self {
                plan: HashMap::new(),
                fallback: outcome,
            }
        }

        fn with(mut self, metric: NasMetricName, delay: Duration, outcome: Result<f64, FetchError>) -> Self {
            self.plan.insert(metric, (delay, outcome));
            self
        }
    }

    #[async_trait]
    impl MetricFetcher for StubFetcher {
        async fn fetch(&self, metric: NasMetricName, _target: &TargetInstance) -> Result<f64, FetchError> {
            match self.plan.get(&metric) {
                Some((delay, outcome)) => {
                    tokio::time::sleep(*delay).await;
                    outcome.clone()
                }
                None => self.fallback.clone(),
            }
        }
    }

    struct PanicsOn(NasMetricName);

    #[async_trait]
    impl MetricFetcher for PanicsOn {
        async fn fetch(&self, metric: NasMetricName, _target: &TargetInstance) -> Result<f64, FetchError> {
            if metric == self.0 {
                panic!("fetcher exploded");
            }
            Ok(1.0)
        }
    }

    fn collector(fetcher: impl MetricFetcher + 'static, set: Arc<MetricSet>) -> NasCollector {
        NasCollector::new(Arc::new(fetcher), set, TargetInstance::new("nas001", "jp-east-1"))
    }

    fn find<'a>(samples: &'a [Sample], fq_name: &str, label: &str, value: &str) -> Option<&'a Sample> {
        samples
            .iter()
            .find(|s| s.desc().fq_name() == fq_name && s.label(label) == Some(value))
    }

    const DURATION: &str = "nifcloud_nas_scrape_collector_duration_seconds";
    const SUCCESS: &str = "nifcloud_nas_scrape_collector_success";

    #[tokio::test]
    async fn every_metric_reported_when_all_fail() {
        let c = collector(StubFetcher::always(Err(FetchError::no_data())), MetricSet::nas());
        let samples = c.collect().await;

        assert_eq!(samples.len(), 22);
        let expected: HashSet<_> = NasMetricName::ALL.iter().map(|m| m.as_str()).collect();
        for family in [DURATION, SUCCESS] {
            let names: HashSet<_> = samples
                .iter()
                .filter(|s| s.desc().fq_name() == family)
                .filter_map(|s| s.label("metric_name"))
                .collect();
            assert_eq!(names, expected);
        }
        assert!(samples
            .iter()
            .filter(|s| s.desc().fq_name() == SUCCESS)
            .all(|s| s.value() == 0.0));
    }

    #[tokio::test]
    async fn one_success_one_failure() {
        let a = NasMetricName::FreeStorageSpace;
        let b = NasMetricName::ReadIops;
        let fetcher = StubFetcher::always(Ok(0.0))
            .with(a, Duration::from_millis(50), Ok(42.0))
            .with(b, Duration::from_millis(10), Err(FetchError::transport("connection reset")));
        let c = collector(fetcher, MetricSet::with_metrics(&[a, b]));

        let samples = c.collect().await;
        assert_eq!(samples.len(), 5);

        let value = find(&samples, "nifcloud_nas_free_storage_space", "instance", "nas001").unwrap();
        assert_eq!(value.value(), 42.0);
        assert_eq!(value.label("region"), Some("jp-east-1"));
        assert!(find(&samples, "nifcloud_nas_read_iops", "instance", "nas001").is_none());

        assert_eq!(find(&samples, SUCCESS, "metric_name", "FreeStorageSpace").unwrap().value(), 1.0);
        assert_eq!(find(&samples, SUCCESS, "metric_name", "ReadIOPS").unwrap().value(), 0.0);

        let dur_a = find(&samples, DURATION, "metric_name", "FreeStorageSpace").unwrap().value();
        let dur_b = find(&samples, DURATION, "metric_name", "ReadIOPS").unwrap().value();
        assert!((0.05..1.0).contains(&dur_a), "duration A = {dur_a}");
        assert!((0.01..1.0).contains(&dur_b), "duration B = {dur_b}");
    }

    #[tokio::test]
    async fn fetches_run_concurrently() {
        let mut fetcher = StubFetcher::always(Ok(0.0));
        for m in NasMetricName::ALL {
            fetcher = fetcher.with(m, Duration::from_millis(200), Ok(1.0));
        }
        let c = collector(fetcher, MetricSet::nas());

        let start = Instant::now();
        let samples = c.collect().await;
        let elapsed = start.elapsed();

        assert_eq!(samples.len(), 33);
        assert!(elapsed < Duration::from_millis(1500), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn repeated_passes_are_identical_apart_from_durations() {
        let fetcher = StubFetcher::always(Ok(7.0))
            .with(NasMetricName::WriteIops, Duration::ZERO, Err(FetchError::no_data()));
        let c = collector(fetcher, MetricSet::nas());

        let without_durations = |samples: Vec<Sample>| {
            let kept: Vec<_> = samples
                .into_iter()
                .filter(|s| s.desc().fq_name() != DURATION)
                .collect();
            crate::exposition::render(&c.describe(), &kept)
        };

        let first = without_durations(c.collect().await);
        let second = without_durations(c.collect().await);
        assert_eq!(first, second);
        assert!(first.contains("nifcloud_nas_scrape_collector_success{metric_name=\"WriteIOPS\"} 0"));
    }

    #[tokio::test]
    async fn slow_fetch_hits_deadline() {
        let fetcher = StubFetcher::always(Ok(1.0)).with(
            NasMetricName::ActiveConnections,
            Duration::from_secs(5),
            Ok(3.0),
        );
        let c = collector(fetcher, MetricSet::with_metrics(&[NasMetricName::ActiveConnections]))
            .with_fetch_timeout(Some(Duration::from_millis(50)));

        let samples = c.collect().await;
        assert_eq!(find(&samples, SUCCESS, "metric_name", "ActiveConnections").unwrap().value(), 0.0);
        assert!(find(&samples, "nifcloud_nas_active_connections", "instance", "nas001").is_none());
    }

    #[tokio::test]
    async fn panicking_fetch_still_reports_failure() {
        let c = collector(PanicsOn(NasMetricName::ReadThroughput), MetricSet::nas());
        let samples = c.collect().await;

        assert_eq!(find(&samples, SUCCESS, "metric_name", "ReadThroughput").unwrap().value(), 0.0);
        assert!(find(&samples, DURATION, "metric_name", "ReadThroughput").is_some());
        assert_eq!(find(&samples, SUCCESS, "metric_name", "WriteThroughput").unwrap().value(), 1.0);
        assert_eq!(samples.len(), 10 * 3 + 2);
    }
}
