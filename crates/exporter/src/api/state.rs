use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit};

use super::self_metrics::ExporterMetrics;
use crate::collector::NasCollector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeOptions {
    pub telemetry_path: String,
    /// Concurrent scrapes allowed; 0 means unlimited.
    pub max_requests: usize,
    pub include_exporter_metrics: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            telemetry_path: "/metrics".to_string(),
            max_requests: 40,
            include_exporter_metrics: true,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    collector: NasCollector,
    exporter_metrics: Arc<ExporterMetrics>,
    limiter: Option<Semaphore>,
    options: ServeOptions,
}

impl AppState {
    pub fn new(collector: NasCollector, options: ServeOptions) -> Self {
        let limiter = (options.max_requests > 0).then(|| Semaphore::new(options.max_requests));
        Self {
            inner: Arc::new(Inner {
                collector,
                exporter_metrics: ExporterMetrics::new(),
                limiter,
                options,
            }),
        }
    }

    pub fn collector(&self) -> &NasCollector {
        &self.inner.collector
    }

    pub fn exporter_metrics(&self) -> &Arc<ExporterMetrics> {
        &self.inner.exporter_metrics
    }

    pub fn options(&self) -> &ServeOptions {
        &self.inner.options
    }

    /// A scrape slot, `Ok(None)` when unlimited, `Err(limit)` when all are taken.
    pub fn try_acquire(&self) -> Result<Option<SemaphorePermit<'_>>, usize> {
        match &self.inner.limiter {
            None => Ok(None),
            Some(sem) => sem
                .try_acquire()
                .map(Some)
                .map_err(|_| self.inner.options.max_requests),
        }
    }
}
