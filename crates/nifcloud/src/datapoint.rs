use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::response::RawDatapoint;

/// A parsed sample: the `Sum` aggregate at `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TryFrom<&RawDatapoint> for DataPoint {
    type Error = FetchError;

    fn try_from(raw: &RawDatapoint) -> Result<Self, Self::Error> {
        let ts = raw.timestamp.as_deref().unwrap_or_default();
        let timestamp = DateTime::parse_from_rfc3339(ts)
            .map_err(|e| FetchError::parse_failure(format!("could not parse timestamp {ts:?}: {e}")))?
            .with_timezone(&Utc);

        let sum = raw.sum.as_deref().unwrap_or_default();
        let value = sum
            .parse::<f64>()
            .map_err(|e| FetchError::parse_failure(format!("could not parse sum {sum:?}: {e}")))?;

        Ok(Self { timestamp, value })
    }
}

/// Value of the point with the strictly latest timestamp.
///
/// Points may arrive in any order. Every point must parse, even ones that
/// would lose. On a timestamp tie the first one seen is kept.
pub fn select_latest(points: &[RawDatapoint]) -> Result<f64, FetchError> {
    let mut latest: Option<DataPoint> = None;
    for raw in points {
        let point = DataPoint::try_from(raw)?;
        match latest {
            Some(current) if point.timestamp <= current.timestamp => {}
            _ => latest = Some(point),
        }
    }
    latest.map(|p| p.value).ok_or_else(FetchError::no_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn raw(ts: &str, sum: &str) -> RawDatapoint {
        RawDatapoint::new(ts, sum)
    }

    #[test]
    fn picks_latest_regardless_of_order() {
        let points = vec![
            raw("2020-01-02T03:02:00Z", "2"),
            raw("2020-01-02T03:03:00Z", "3"),
            raw("2020-01-02T03:01:00Z", "1"),
        ];
        assert_eq!(select_latest(&points).unwrap(), 3.0);
    }

    #[test]
    fn compares_instants_not_strings() {
        let points = vec![
            raw("2020-01-02T12:00:00+09:00", "1"),
            raw("2020-01-02T04:00:00Z", "5"),
        ];
        assert_eq!(select_latest(&points).unwrap(), 5.0);
    }

    #[test]
    fn first_seen_wins_on_tie() {
        let points = vec![
            raw("2020-01-02T03:03:00Z", "10"),
            raw("2020-01-02T03:03:00Z", "20"),
            raw("2020-01-02T03:01:00Z", "30"),
        ];
        assert_eq!(select_latest(&points).unwrap(), 10.0);
    }

    #[test]
    fn empty_is_no_data() {
        assert_eq!(select_latest(&[]).unwrap_err().kind(), ErrorKind::NoData);
    }

    #[test]
    fn malformed_timestamp_fails() {
        let points = vec![
            raw("2020-01-02T03:03:00Z", "10"),
            raw("2020/01/02 03:04", "20"),
        ];
        let err = select_latest(&points).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(err.to_string().contains("2020/01/02 03:04"));
    }

    #[test]
    fn malformed_sum_on_losing_point_still_fails() {
        let points = vec![
            raw("2020-01-02T03:03:00Z", "10"),
            raw("2020-01-02T03:00:00Z", "n/a"),
        ];
        assert_eq!(select_latest(&points).unwrap_err().kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn missing_sum_fails() {
        let point = RawDatapoint {
            timestamp: Some("2020-01-02T03:03:00Z".into()),
            sum: None,
        };
        assert_eq!(select_latest(&[point]).unwrap_err().kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn single_point() {
        let points = vec![raw("2020-01-02T03:03:00Z", "1.5e3")];
        assert_eq!(select_latest(&points).unwrap(), 1500.0);
    }

    #[test]
    fn padded_sum_fails() {
        let points = vec![raw("2020-01-02T03:03:00Z", " 42 ")];
        let err = select_latest(&points).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }
}
