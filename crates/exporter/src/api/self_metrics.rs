use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;

use crate::collector::EXPORTER_NAME;
use crate::exposition::{Desc, Sample, ValueType};

/// Metrics about the exporter itself.
#[derive(Debug)]
pub struct ExporterMetrics {
    responses_ok: AtomicU64,
    responses_limited: AtomicU64,
    responses_other: AtomicU64,
    in_flight: AtomicI64,
    build_info: Arc<Desc>,
    requests_total: Arc<Desc>,
    requests_in_flight: Arc<Desc>,
}

impl ExporterMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_response(&self, status: StatusCode) {
        let counter = match status {
            StatusCode::OK => &self.responses_ok,
            StatusCode::SERVICE_UNAVAILABLE => &self.responses_limited,
            _ => &self.responses_other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a request as in flight until the guard drops.
    pub fn track_in_flight(&self) -> InFlightGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard { metrics: self }
    }

    pub fn in_flight(&self) -> i64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn responses(&self, status: StatusCode) -> u64 {
        match status {
            StatusCode::OK => self.responses_ok.load(Ordering::Relaxed),
            StatusCode::SERVICE_UNAVAILABLE => self.responses_limited.load(Ordering::Relaxed),
            _ => self.responses_other.load(Ordering::Relaxed),
        }
    }

    pub fn describe(&self, include_handler_metrics: bool) -> Vec<Arc<Desc>> {
        let mut descs = vec![self.build_info.clone()];
        if include_handler_metrics {
            descs.push(self.requests_total.clone());
            descs.push(self.requests_in_flight.clone());
        }
        descs
    }

    pub fn samples(&self, include_handler_metrics: bool) -> Vec<Sample> {
        let mut samples = vec![Sample::new(
            &self.build_info,
            1.0,
            vec![env!("CARGO_PKG_VERSION").to_string()],
        )];
        if include_handler_metrics {
            for (code, counter) in [
                ("200", &self.responses_ok),
                ("503", &self.responses_limited),
                ("500", &self.responses_other),
            ] {
                samples.push(Sample::new(
                    &self.requests_total,
                    counter.load(Ordering::Relaxed) as f64,
                    vec![code.to_string()],
                ));
            }
            samples.push(Sample::new(&self.requests_in_flight, self.in_flight() as f64, vec![]));
        }
        samples
    }
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self {
            responses_ok: AtomicU64::new(0),
            responses_limited: AtomicU64::new(0),
            responses_other: AtomicU64::new(0),
            in_flight: AtomicI64::new(0),
            build_info: Desc::gauge(
                format!("{EXPORTER_NAME}_build_info"),
                format!("A metric with a constant '1' value labeled by version from which {EXPORTER_NAME} was built."),
                &["version"],
            ),
            requests_total: Desc::new(
                format!("{EXPORTER_NAME}_metric_handler_requests_total"),
                "Total number of scrapes by HTTP status code.",
                &["code"],
                ValueType::Counter,
            ),
            requests_in_flight: Desc::gauge(
                format!("{EXPORTER_NAME}_metric_handler_requests_in_flight"),
                "Current number of scrapes being served.",
                &[],
            ),
        }
    }
}

pub struct InFlightGuard<'a> {
    metrics: &'a ExporterMetrics,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposition::render;

    #[test]
    fn counts_by_status() {
        let m = ExporterMetrics::new();
        m.record_response(StatusCode::OK);
        m.record_response(StatusCode::OK);
        m.record_response(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(m.responses(StatusCode::OK), 2);
        assert_eq!(m.responses(StatusCode::SERVICE_UNAVAILABLE), 1);
        assert_eq!(m.responses(StatusCode::INTERNAL_SERVER_ERROR), 0);
    }

    #[test]
    fn in_flight_guard_decrements() {
        let m = ExporterMetrics::new();
        {
            let _a = m.track_in_flight();
            let _b = m.track_in_flight();
            assert_eq!(m.in_flight(), 2);
        }
        assert_eq!(m.in_flight(), 0);
    }

    #[test]
    fn build_info_always_present() {
        let m = ExporterMetrics::new();
        let text = render(&m.describe(false), &m.samples(false));
        assert!(text.contains(&format!(
            "nifcloud_nas_exporter_build_info{{version=\"{}\"}} 1",
            env!("CARGO_PKG_VERSION")
        )));
        assert!(!text.contains("metric_handler"));
    }

    #[test]
    fn handler_metrics_rendered_when_enabled() {
        let m = ExporterMetrics::new();
        m.record_response(StatusCode::OK);
        let text = render(&m.describe(true), &m.samples(true));
        assert!(text.contains("# TYPE nifcloud_nas_exporter_metric_handler_requests_total counter"));
        assert!(text.contains("nifcloud_nas_exporter_metric_handler_requests_total{code=\"200\"} 1"));
        assert!(text.contains("nifcloud_nas_exporter_metric_handler_requests_in_flight 0"));
    }
}
