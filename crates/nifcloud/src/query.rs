use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::metric_name::NasMetricName;

pub const ACTION: &str = "GetMetricStatistics";
pub const API_VERSION: &str = "N2016-02-24";
pub const DIMENSION_NAME: &str = "NASInstanceIdentifier";
/// `StartTime`/`EndTime` layout, always UTC.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window of `length` ending at `end`.
    pub fn trailing(end: DateTime<Utc>, length: Duration) -> Result<Self, FetchError> {
        let length = chrono::Duration::from_std(length)
            .map_err(|e| FetchError::request_build(format!("window length: {e}")))?;
        let start = end
            .checked_sub_signed(length)
            .ok_or_else(|| FetchError::request_build("window start out of range"))?;
        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricStatisticsQuery {
    metric: NasMetricName,
    instance_identifier: String,
    window: QueryWindow,
}

impl MetricStatisticsQuery {
    pub fn new(
        metric: NasMetricName,
        instance_identifier: impl Into<String>,
        window: QueryWindow,
    ) -> Result<Self, FetchError> {
        let instance_identifier = instance_identifier.into();
        if instance_identifier.trim().is_empty() {
            return Err(FetchError::request_build("instance identifier must not be empty"));
        }
        if window.start > window.end {
            return Err(FetchError::request_build(format!(
                "window starts after it ends ({} > {})",
                window.start, window.end
            )));
        }
        Ok(Self {
            metric,
            instance_identifier,
            window,
        })
    }

    pub fn metric(&self) -> NasMetricName {
        self.metric
    }

    pub fn instance_identifier(&self) -> &str {
        &self.instance_identifier
    }

    pub fn window(&self) -> QueryWindow {
        self.window
    }

    /// Form-encoded request body.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", ACTION)
            .append_pair("Version", API_VERSION)
            .append_pair("Dimensions.member.1.Name", DIMENSION_NAME)
            .append_pair("Dimensions.member.1.Value", &self.instance_identifier)
            .append_pair("MetricName", self.metric.as_str())
            .append_pair(
                "StartTime",
                &self.window.start.format(TIMESTAMP_LAYOUT).to_string(),
            )
            .append_pair("EndTime", &self.window.end.format(TIMESTAMP_LAYOUT).to_string())
            .finish()
    }
}
