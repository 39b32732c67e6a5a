use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::error::FetchError;

/// One `Datapoints/member` entry, still in its wire representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawDatapoint {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "Sum", default)]
    pub sum: Option<String>,
}

impl RawDatapoint {
    pub fn new(timestamp: impl Into<String>, sum: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            sum: Some(sum.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetMetricStatisticsResponse {
    #[serde(rename = "GetMetricStatisticsResult")]
    result: GetMetricStatisticsResult,
}

#[derive(Debug, Deserialize)]
struct GetMetricStatisticsResult {
    #[serde(rename = "Datapoints", default)]
    datapoints: Datapoints,
}

#[derive(Debug, Default, Deserialize)]
struct Datapoints {
    #[serde(rename = "member", default)]
    members: Vec<RawDatapoint>,
}

pub(crate) fn decode_datapoints(body: &str) -> Result<Vec<RawDatapoint>, FetchError> {
    let resp: GetMetricStatisticsResponse = quick_xml::de::from_str(body)
        .map_err(|e| FetchError::transport(format!("undecodable response: {e}")))?;
    Ok(resp.result.datapoints.members)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Picks `Code` and `Message` out of an error document, whatever its envelope.
pub(crate) fn decode_error(body: &str) -> Option<ApiError> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut current: Option<&'static str> = None;
    let mut err = ApiError::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"Code" => Some("code"),
                    b"Message" => Some("message"),
                    _ => None,
                };
            }
            Ok(Event::Text(t)) => {
                if let Some(field) = current {
                    let text = t.unescape().ok()?.into_owned();
                    match field {
                        "code" if err.code.is_none() => err.code = Some(text),
                        "message" if err.message.is_none() => err.message = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }

    if err.code.is_none() && err.message.is_none() {
        None
    } else {
        Some(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TWO_POINTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GetMetricStatisticsResponse xmlns="https://nas.api.nifcloud.com/doc/2016-02-24/">
  <GetMetricStatisticsResult>
    <Datapoints>
      <member>
        <Timestamp>2020-01-02T03:03:00Z</Timestamp>
        <Sum>100.5</Sum>
        <SampleCount>1</SampleCount>
      </member>
      <member>
        <Timestamp>2020-01-02T03:02:00Z</Timestamp>
        <Sum>99</Sum>
        <SampleCount>1</SampleCount>
      </member>
    </Datapoints>
    <Label>FreeStorageSpace</Label>
  </GetMetricStatisticsResult>
  <ResponseMetadata>
    <RequestId>f7a6c3e1-0000-0000-0000-000000000000</RequestId>
  </ResponseMetadata>
</GetMetricStatisticsResponse>"#;

    #[test]
    fn decodes_members_in_wire_order() {
        let points = decode_datapoints(TWO_POINTS).unwrap();
        assert_eq!(
            points,
            vec![
                RawDatapoint::new("2020-01-02T03:03:00Z", "100.5"),
                RawDatapoint::new("2020-01-02T03:02:00Z", "99"),
            ]
        );
    }

    #[test]
    fn empty_datapoints_decode_to_empty_vec() {
        let body = "<GetMetricStatisticsResponse><GetMetricStatisticsResult><Datapoints></Datapoints><Label>ReadIOPS</Label></GetMetricStatisticsResult></GetMetricStatisticsResponse>";
        assert!(decode_datapoints(body).unwrap().is_empty());
    }

    #[test]
    fn missing_datapoints_decode_to_empty_vec() {
        let body = "<GetMetricStatisticsResponse><GetMetricStatisticsResult><Label>ReadIOPS</Label></GetMetricStatisticsResult></GetMetricStatisticsResponse>";
        assert!(decode_datapoints(body).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_transport_error() {
        let err = decode_datapoints("not xml at all").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn error_document_fields() {
        let body = r#"<Response><Errors><Error><Code>AuthFailure</Code><Message>The request signature does not match.</Message></Error></Errors><RequestID>x</RequestID></Response>"#;
        let err = decode_error(body).unwrap();
        assert_eq!(err.code.as_deref(), Some("AuthFailure"));
        assert_eq!(
            err.message.as_deref(),
            Some("The request signature does not match.")
        );
    }

    #[test]
    fn non_error_body_yields_none() {
        assert!(decode_error("<html><body>Bad Gateway</body></html>").is_none());
    }
}
