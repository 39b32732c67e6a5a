use anyhow::Context;
use clap::Parser;
use nas_exporter::cli::Args;
use nas_exporter::collector::EXPORTER_NAME;
use nas_exporter::config::LogFormat;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve().context("invalid configuration")?;

    init_logging(config.log.format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting {EXPORTER_NAME}");

    nas_exporter::run::run(config).await
}

fn init_logging(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
