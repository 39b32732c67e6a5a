mod loader;
mod schema;

pub use loader::{
    load_from_file, load_from_str, parse_listen_address, validate, LoadError, MAX_WINDOW_SECONDS,
};
pub use schema::{ExporterConfig, LogConfig, LogFormat, NifcloudConfig, ScrapeConfig, WebConfig};
