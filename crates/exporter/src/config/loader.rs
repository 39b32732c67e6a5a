use std::net::SocketAddr;
use std::path::Path;

use super::schema::ExporterConfig;
use crate::api::HEALTH_PATH;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

/// Reads a config file. Not validated: flags may still fill in required values.
pub fn load_from_file(path: &Path) -> Result<ExporterConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<ExporterConfig, LoadError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Longest trailing query window accepted, one day.
pub const MAX_WINDOW_SECONDS: u64 = 86_400;

pub fn validate(cfg: &ExporterConfig) -> Result<(), LoadError> {
    let required = [
        ("nifcloud.nas_instance_id", &cfg.nifcloud.nas_instance_id),
        ("nifcloud.region", &cfg.nifcloud.region),
        ("nifcloud.access_key_id", &cfg.nifcloud.access_key_id),
        ("nifcloud.secret_access_key", &cfg.nifcloud.secret_access_key),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(LoadError::Validation(format!("{name} must not be empty")));
        }
    }

    parse_listen_address(&cfg.web.listen_address)?;

    let path = &cfg.web.telemetry_path;
    if !path.starts_with('/') {
        return Err(LoadError::Validation(format!(
            "web.telemetry_path must start with '/', got {path:?}"
        )));
    }
    if path == HEALTH_PATH {
        return Err(LoadError::Validation(format!(
            "web.telemetry_path must not be {HEALTH_PATH}"
        )));
    }

    let window = cfg.scrape.window_seconds;
    if window == 0 || window > MAX_WINDOW_SECONDS {
        return Err(LoadError::Validation(format!(
            "scrape.window_seconds must be in 1..={MAX_WINDOW_SECONDS}, got {window}"
        )));
    }
    if cfg.scrape.fetch_timeout_seconds == Some(0) {
        return Err(LoadError::Validation(
            "scrape.fetch_timeout_seconds must be > 0 when set".into(),
        ));
    }
    Ok(())
}

/// Accepts `host:port` and the bare `:port` form, which binds all interfaces.
pub fn parse_listen_address(raw: &str) -> Result<SocketAddr, LoadError> {
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };
    full.parse()
        .map_err(|e| LoadError::Validation(format!("web.listen_address {raw:?}: {e}")))
}
