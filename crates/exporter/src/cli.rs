use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, ExporterConfig, LoadError, LogFormat};

/// Flags override values read from `--config`.
#[derive(Debug, Default, Parser)]
#[command(
    name = "nas_exporter",
    version,
    about = "Prometheus exporter for NIFCLOUD NAS instance statistics"
)]
pub struct Args {
    #[arg(short = 'c', long, help = "YAML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "web.listen-address",
        help = "Address on which to expose metrics and web interface [default: 0.0.0.0:9123]"
    )]
    pub listen_address: Option<String>,

    #[arg(
        long = "web.telemetry-path",
        help = "Path under which to expose metrics [default: /metrics]"
    )]
    pub telemetry_path: Option<String>,

    #[arg(
        long = "web.disable-exporter-metrics",
        help = "Exclude metrics about the exporter itself"
    )]
    pub disable_exporter_metrics: bool,

    #[arg(
        long = "web.max-requests",
        help = "Maximum number of parallel scrape requests, 0 to disable [default: 40]"
    )]
    pub max_requests: Option<usize>,

    #[arg(long = "nifcloud.nas-instance-id", help = "Target NAS instance identifier")]
    pub nas_instance_id: Option<String>,

    #[arg(
        long = "nifcloud.region",
        help = "Region the target instance lives in [default: jp-east-1]"
    )]
    pub region: Option<String>,

    #[arg(
        long = "nifcloud.access-key-id",
        env = "NIFCLOUD_ACCESS_KEY_ID",
        hide_env_values = true,
        help = "Access key id used to fetch the metrics"
    )]
    pub access_key_id: Option<String>,

    #[arg(
        long = "nifcloud.secret-access-key",
        env = "NIFCLOUD_SECRET_ACCESS_KEY",
        hide_env_values = true,
        help = "Secret access key used to fetch the metrics"
    )]
    pub secret_access_key: Option<String>,

    #[arg(long = "nifcloud.endpoint", help = "Override the API endpoint URL")]
    pub endpoint: Option<String>,

    #[arg(
        long = "scrape.window-seconds",
        help = "Trailing query window per fetch [default: 180]"
    )]
    pub window_seconds: Option<u64>,

    #[arg(
        long = "scrape.fetch-timeout-seconds",
        help = "Deadline for each metric fetch [default: none]"
    )]
    pub fetch_timeout_seconds: Option<u64>,

    #[arg(long = "log.format", value_enum, help = "Log output format [default: text]")]
    pub log_format: Option<LogFormat>,
}

impl Args {
    /// File (or defaults), then flags, then validation.
    pub fn resolve(&self) -> Result<ExporterConfig, LoadError> {
        let base = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => ExporterConfig::default(),
        };
        let cfg = self.apply(base);
        config::validate(&cfg)?;
        Ok(cfg)
    }

    pub fn apply(&self, mut cfg: ExporterConfig) -> ExporterConfig {
        fn set<T: Clone>(target: &mut T, flag: &Option<T>) {
            if let Some(v) = flag {
                *target = v.clone();
            }
        }

        set(&mut cfg.web.listen_address, &self.listen_address);
        set(&mut cfg.web.telemetry_path, &self.telemetry_path);
        set(&mut cfg.web.max_requests, &self.max_requests);
        if self.disable_exporter_metrics {
            cfg.web.disable_exporter_metrics = true;
        }

        set(&mut cfg.nifcloud.nas_instance_id, &self.nas_instance_id);
        set(&mut cfg.nifcloud.region, &self.region);
        set(&mut cfg.nifcloud.access_key_id, &self.access_key_id);
        set(&mut cfg.nifcloud.secret_access_key, &self.secret_access_key);
        if self.endpoint.is_some() {
            cfg.nifcloud.endpoint = self.endpoint.clone();
        }

        set(&mut cfg.scrape.window_seconds, &self.window_seconds);
        if self.fetch_timeout_seconds.is_some() {
            cfg.scrape.fetch_timeout_seconds = self.fetch_timeout_seconds;
        }

        set(&mut cfg.log.format, &self.log_format);
        cfg
    }
}
