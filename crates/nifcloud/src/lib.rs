//! Client for the NIFCLOUD NAS `GetMetricStatistics` action.
//!
//! Only what a statistics exporter needs: a signed, time-windowed query for one
//! metric of one NAS instance, and the data points it returns.

mod client;
mod credentials;
mod datapoint;
mod error;
mod metric_name;
mod query;
mod response;
mod signer;

pub use client::{default_endpoint, NasClient};
pub use credentials::Credentials;
pub use datapoint::{select_latest, DataPoint};
pub use error::{ErrorKind, FetchError};
pub use metric_name::NasMetricName;
pub use query::{MetricStatisticsQuery, QueryWindow, API_VERSION, DIMENSION_NAME, TIMESTAMP_LAYOUT};
pub use response::RawDatapoint;
pub use signer::{RequestSigner, SignedHeaders, SERVICE_NAME, SIGN_ALGORITHM};
