use std::sync::Arc;

use nifcloud_nas::NasMetricName;

use crate::exposition::{build_fq_name, Desc};

pub const NAMESPACE: &str = "nifcloud_nas";
pub const EXPORTER_NAME: &str = "nifcloud_nas_exporter";

pub const TARGET_LABELS: [&str; 2] = ["instance", "region"];
pub const METRIC_NAME_LABEL: &str = "metric_name";

/// A tracked statistic and the gauge it is published as.
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub name: NasMetricName,
    pub desc: Arc<Desc>,
}

impl MetricDefinition {
    pub fn new(name: NasMetricName) -> Self {
        let (suffix, help) = exposition_of(name);
        Self {
            name,
            desc: Desc::gauge(build_fq_name(NAMESPACE, "", suffix), help, &TARGET_LABELS),
        }
    }
}

fn exposition_of(name: NasMetricName) -> (&'static str, &'static str) {
    match name {
        NasMetricName::FreeStorageSpace => (
            "free_storage_space",
            "The amount of available storage space. Units: Bytes",
        ),
        NasMetricName::UsedStorageSpace => (
            "used_storage_space",
            "The amount of used storage space. Units: Bytes",
        ),
        NasMetricName::ReadIops => (
            "read_iops",
            "The average number of disk read I/O operations per second. Units: Count/Second",
        ),
        NasMetricName::WriteIops => (
            "write_iops",
            "The average number of disk write I/O operations per second. Units: Count/Second",
        ),
        NasMetricName::ReadThroughput => (
            "read_throughput",
            "The average number of bytes read from disk per second. Units: Bytes/Second",
        ),
        NasMetricName::WriteThroughput => (
            "write_throughput",
            "The average number of bytes written to disk per second. Units: Bytes/Second",
        ),
        NasMetricName::ActiveConnections => (
            "active_connections",
            "The active connection counts. Units: Count",
        ),
        NasMetricName::GlobalReadTraffic => (
            "global_read_traffic",
            "The incoming (Receive) network traffic from global on the NAS instance. Units: Bytes/second",
        ),
        NasMetricName::PrivateReadTraffic => (
            "private_read_traffic",
            "The incoming (Receive) network traffic from private on the NAS instance. Units: Bytes/second",
        ),
        NasMetricName::GlobalWriteTraffic => (
            "global_write_traffic",
            "The outgoing (Transmit) network traffic to global on the NAS instance. Units: Bytes/second",
        ),
        NasMetricName::PrivateWriteTraffic => (
            "private_write_traffic",
            "The outgoing (Transmit) network traffic to private on the NAS instance. Units: Bytes/second",
        ),
    }
}

/// Everything a collection pass can emit. Built once, shared read-only.
#[derive(Debug)]
pub struct MetricSet {
    metrics: Vec<MetricDefinition>,
    scrape_duration: Arc<Desc>,
    scrape_success: Arc<Desc>,
}

impl MetricSet {
    /// The full set of NAS statistics.
    pub fn nas() -> Arc<Self> {
        Self::with_metrics(&NasMetricName::ALL)
    }

    pub fn with_metrics(names: &[NasMetricName]) -> Arc<Self> {
        Arc::new(Self {
            metrics: names.iter().copied().map(MetricDefinition::new).collect(),
            scrape_duration: Desc::gauge(
                build_fq_name(NAMESPACE, "scrape", "collector_duration_seconds"),
                format!("{EXPORTER_NAME}: Duration of a collector scrape."),
                &[METRIC_NAME_LABEL],
            ),
            scrape_success: Desc::gauge(
                build_fq_name(NAMESPACE, "scrape", "collector_success"),
                format!("{EXPORTER_NAME}: Whether a collector succeeded."),
                &[METRIC_NAME_LABEL],
            ),
        })
    }

    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn scrape_duration(&self) -> &Arc<Desc> {
        &self.scrape_duration
    }

    pub fn scrape_success(&self) -> &Arc<Desc> {
        &self.scrape_success
    }

    /// Value gauges in fixed order, then the two meta gauges.
    pub fn describe(&self) -> Vec<Arc<Desc>> {
        self.metrics
            .iter()
            .map(|m| m.desc.clone())
            .chain([self.scrape_duration.clone(), self.scrape_success.clone()])
            .collect()
    }
}
