use clap::Parser;
use fxboard::{logging, TuiOpts};
use fxboard_application::config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "fxboard")]
#[command(about = "Live forex quote dashboard (TUI).", version)]
struct Cli {
    /// Config file path (TOML). If omitted, uses env FXBOARD_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override feed.url from the config.
    #[arg(long)]
    feed_url: Option<String>,

    /// Override feed.refresh_secs from the config.
    #[arg(long)]
    refresh_secs: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    let log_store = Arc::new(parking_lot::Mutex::new(logging::LogStore::new(5000)));
    if let Err(err) = init_tracing(log_store.clone()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let config_path = cli.config.or_else(|| {
        std::env::var("FXBOARD_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });
    let config = match load_config(config_path, cli.feed_url, cli.refresh_secs) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let opts = TuiOpts { config, log_store };

    if let Err(err) = fxboard::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<PathBuf>,
    feed_url: Option<String>,
    refresh_secs: Option<u64>,
) -> Result<config::Config, String> {
    let mut config = config::load_config_or_default(path.as_deref())?;
    if let Some(url) = feed_url {
        config.feed.url = url;
    }
    if let Some(secs) = refresh_secs {
        config.feed.refresh_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(log_store: Arc<parking_lot::Mutex<logging::LogStore>>) -> Result<(), String> {
    let filter = std::env::var("FXBOARD_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(logging::LogMakeWriter::new(log_store))
        .init();

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("FXBOARD_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid FXBOARD_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
