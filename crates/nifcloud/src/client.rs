use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::credentials::Credentials;
use crate::datapoint::select_latest;
use crate::error::FetchError;
use crate::query::MetricStatisticsQuery;
use crate::response::{decode_datapoints, decode_error, RawDatapoint};
use crate::signer::{host_header, RequestSigner, FORM_CONTENT_TYPE};

pub fn default_endpoint(region: &str) -> String {
    format!("https://nas.{region}.api.nifcloud.com/")
}

/// Signed HTTP client bound to one region and endpoint.
#[derive(Debug, Clone)]
pub struct NasClient {
    http: reqwest::Client,
    endpoint: Url,
    signer: RequestSigner,
}

impl NasClient {
    /// `endpoint` defaults to the public endpoint of `region`.
    pub fn new(
        credentials: Credentials,
        region: &str,
        endpoint: Option<&str>,
    ) -> Result<Self, FetchError> {
        if region.trim().is_empty() {
            return Err(FetchError::request_build("region must not be empty"));
        }
        if credentials.access_key_id().is_empty() {
            return Err(FetchError::request_build("access key id must not be empty"));
        }

        let raw = endpoint
            .map(str::to_string)
            .unwrap_or_else(|| default_endpoint(region));
        let endpoint = Url::parse(&raw)
            .map_err(|e| FetchError::request_build(format!("invalid endpoint {raw:?}: {e}")))?;
        if host_header(&endpoint).is_none() {
            return Err(FetchError::request_build(format!(
                "endpoint {raw:?} has no host"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("nas_exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            signer: RequestSigner::new(credentials, region),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        self.signer.region()
    }

    /// Sends one query and returns its data points as received.
    pub async fn get_metric_statistics(
        &self,
        query: &MetricStatisticsQuery,
    ) -> Result<Vec<RawDatapoint>, FetchError> {
        let body = query.encode();
        let signed = self.signer.sign(&self.endpoint, body.as_bytes(), Utc::now())?;

        tracing::debug!(
            metric = %query.metric(),
            instance = query.instance_identifier(),
            endpoint = %self.endpoint,
            "GetMetricStatistics"
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header("X-Amz-Date", &signed.amz_date)
            .header(AUTHORIZATION, &signed.authorization)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let detail = match decode_error(&text) {
                Some(api) => format!(
                    "{}: {}",
                    api.code.as_deref().unwrap_or("UnknownError"),
                    api.message.as_deref().unwrap_or("")
                ),
                None => text.chars().take(200).collect(),
            };
            return Err(FetchError::transport(format!(
                "api responded with status {}: {detail}",
                status.as_u16()
            )));
        }

        decode_datapoints(&text)
    }

    /// Latest value over the query window.
    pub async fn fetch_latest(&self, query: &MetricStatisticsQuery) -> Result<f64, FetchError> {
        let points = self.get_metric_statistics(query).await?;
        select_latest(&points)
    }
}
