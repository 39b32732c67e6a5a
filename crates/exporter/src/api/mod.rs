mod health;
mod metrics;
mod self_metrics;
mod server;
mod state;

pub use health::{healthz, landing};
pub use metrics::metrics;
pub use self_metrics::{ExporterMetrics, InFlightGuard};
pub use server::{router, serve, HEALTH_PATH};
pub use state::{AppState, ServeOptions};
