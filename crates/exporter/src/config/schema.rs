use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExporterConfig {
    #[serde(default)]
    pub nifcloud: NifcloudConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Clone, Deserialize, PartialEq)]
pub struct NifcloudConfig {
    #[serde(default)]
    pub nas_instance_id: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WebConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    #[serde(default)]
    pub disable_exporter_metrics: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScrapeConfig {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    #[serde(default)]
    pub fetch_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for NifcloudConfig {
    fn default() -> Self {
        Self {
            nas_instance_id: String::new(),
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            endpoint: None,
        }
    }
}

impl std::fmt::Debug for NifcloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NifcloudConfig")
            .field("nas_instance_id", &self.nas_instance_id)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            telemetry_path: default_telemetry_path(),
            max_requests: default_max_requests(),
            disable_exporter_metrics: false,
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            fetch_timeout_seconds: None,
        }
    }
}

fn default_region() -> String {
    "jp-east-1".to_string()
}

fn default_listen_address() -> String {
    "0.0.0.0:9123".to_string()
}

fn default_telemetry_path() -> String {
    "/metrics".to_string()
}

fn default_max_requests() -> usize {
    40
}

fn default_window_seconds() -> u64 {
    180
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full() {
        let yaml = r#"
nifcloud:
  nas_instance_id: nas001
  region: jp-west-1
  access_key_id: AKID
  secret_access_key: SECRET
  endpoint: http://127.0.0.1:8080/
web:
  listen_address: 127.0.0.1:9999
  telemetry_path: /nas
  max_requests: 0
  disable_exporter_metrics: true
scrape:
  window_seconds: 300
  fetch_timeout_seconds: 20
log:
  format: json
"#;
        let cfg: ExporterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.nifcloud.nas_instance_id, "nas001");
        assert_eq!(cfg.nifcloud.region, "jp-west-1");
        assert_eq!(cfg.nifcloud.endpoint.as_deref(), Some("http://127.0.0.1:8080/"));
        assert_eq!(cfg.web.max_requests, 0);
        assert!(cfg.web.disable_exporter_metrics);
        assert_eq!(cfg.scrape.window_seconds, 300);
        assert_eq!(cfg.scrape.fetch_timeout_seconds, Some(20));
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn defaults_applied() {
        let cfg: ExporterConfig = serde_yaml::from_str("nifcloud:\n  nas_instance_id: nas001\n").unwrap();
        assert_eq!(cfg.nifcloud.region, "jp-east-1");
        assert_eq!(cfg.web.listen_address, "0.0.0.0:9123");
        assert_eq!(cfg.web.telemetry_path, "/metrics");
        assert_eq!(cfg.web.max_requests, 40);
        assert_eq!(cfg.scrape.window_seconds, 180);
        assert!(cfg.scrape.fetch_timeout_seconds.is_none());
        assert_eq!(cfg.log.format, LogFormat::Text);
        assert_eq!(cfg, ExporterConfig {
            nifcloud: NifcloudConfig {
                nas_instance_id: "nas001".into(),
                ..Default::default()
            },
            ..Default::default()
        });
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = NifcloudConfig {
            secret_access_key: "hunter2".into(),
            ..Default::default()
        };
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
