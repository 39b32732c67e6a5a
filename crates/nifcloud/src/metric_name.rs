use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// Statistic names accepted by `GetMetricStatistics` for a NAS instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NasMetricName {
    FreeStorageSpace,
    UsedStorageSpace,
    ReadIops,
    WriteIops,
    ReadThroughput,
    WriteThroughput,
    ActiveConnections,
    GlobalReadTraffic,
    PrivateReadTraffic,
    GlobalWriteTraffic,
    PrivateWriteTraffic,
}

impl NasMetricName {
    pub const ALL: [NasMetricName; 11] = [
        Self::FreeStorageSpace,
        Self::UsedStorageSpace,
        Self::ReadIops,
        Self::WriteIops,
        Self::ReadThroughput,
        Self::WriteThroughput,
        Self::ActiveConnections,
        Self::GlobalReadTraffic,
        Self::PrivateReadTraffic,
        Self::GlobalWriteTraffic,
        Self::PrivateWriteTraffic,
    ];

    /// Name as the API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeStorageSpace => "FreeStorageSpace",
            Self::UsedStorageSpace => "UsedStorageSpace",
            Self::ReadIops => "ReadIOPS",
            Self::WriteIops => "WriteIOPS",
            Self::ReadThroughput => "ReadThroughput",
            Self::WriteThroughput => "WriteThroughput",
            Self::ActiveConnections => "ActiveConnections",
            Self::GlobalReadTraffic => "GlobalReadTraffic",
            Self::PrivateReadTraffic => "PrivateReadTraffic",
            Self::GlobalWriteTraffic => "GlobalWriteTraffic",
            Self::PrivateWriteTraffic => "PrivateWriteTraffic",
        }
    }
}

impl fmt::Display for NasMetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NasMetricName {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| FetchError::request_build(format!("unrecognized metric name {s:?}")))
    }
}
