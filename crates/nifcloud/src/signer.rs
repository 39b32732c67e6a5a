use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use crate::credentials::Credentials;
use crate::error::FetchError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGN_ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE_NAME: &str = "nas";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

const SIGNED_HEADER_NAMES: &str = "content-type;host;x-amz-date";

/// Headers a signed `POST` request must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub authorization: String,
}

/// Signs form-encoded query requests with a Version 4 HMAC-SHA256 signature.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    region: String,
}

impl RequestSigner {
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Signs a form `POST` of `body` to `endpoint`, whose path and query are
    /// part of the canonical request.
    pub fn sign(
        &self,
        endpoint: &Url,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, FetchError> {
        let host = host_header(endpoint)
            .ok_or_else(|| FetchError::request_build(format!("endpoint {endpoint} has no host")))?;
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{SERVICE_NAME}/aws4_request", self.region);

        let canonical = canonical_request(endpoint, &host, &amz_date, body);
        let string_to_sign = format!(
            "{SIGN_ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex_sha256(canonical.as_bytes())
        );

        let key = signing_key(
            self.credentials.secret_access_key(),
            &date,
            &self.region,
            SERVICE_NAME,
        )?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        Ok(SignedHeaders {
            authorization: format!(
                "{SIGN_ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADER_NAMES}, Signature={signature}",
                self.credentials.access_key_id()
            ),
            amz_date,
        })
    }
}

/// `Host` header value for `url`, keeping an explicit port.
pub(crate) fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn canonical_request(endpoint: &Url, host: &str, amz_date: &str, body: &[u8]) -> String {
    let path = match endpoint.path() {
        "" => "/",
        p => p,
    };
    format!(
        "POST\n{path}\n{}\ncontent-type:{FORM_CONTENT_TYPE}\nhost:{host}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADER_NAMES}\n{}",
        canonical_query(endpoint.query()),
        hex_sha256(body)
    )
}

/// Raw query pairs sorted by key, with `+` spelled as `%20`.
fn canonical_query(query: Option<&str>) -> String {
    let Some(query) = query else {
        return String::new();
    };
    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| p.split_once('=').unwrap_or((p, "")))
        .collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
        .replace('+', "%20")
}

pub(crate) fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<[u8; 32], FetchError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], FetchError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| FetchError::request_build(format!("signing key: {e}")))?;
    mac.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
