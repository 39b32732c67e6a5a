mod definitions;
mod fetcher;
mod nas;
mod result;
mod target;

pub use definitions::{
    MetricDefinition, MetricSet, EXPORTER_NAME, METRIC_NAME_LABEL, NAMESPACE, TARGET_LABELS,
};
pub use fetcher::{MetricFetcher, NifcloudFetcher, DEFAULT_WINDOW};
pub use nas::NasCollector;
pub use result::ScrapeResult;
pub use target::TargetInstance;
