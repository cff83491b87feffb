mod server;

use clap::Parser;
use fxboard_application::config;
use fxboard_infrastructure::ProviderClient;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "fxboard-gateway")]
#[command(about = "Forex quote gateway exposing GET /api/forex.", version)]
struct Cli {
    /// Config file path (TOML). If omitted, uses env FXBOARD_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override gateway.bind from the config.
    #[arg(long)]
    bind: Option<String>,

    /// Override gateway.provider_url from the config.
    #[arg(long)]
    provider_url: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config_path = cli.config.or_else(|| {
        std::env::var("FXBOARD_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });
    let mut config = config::load_config_or_default(config_path.as_deref())?;
    if let Some(bind) = cli.bind {
        config.gateway.bind = bind;
    }
    if let Some(provider_url) = cli.provider_url {
        config.gateway.provider_url = provider_url;
    }
    config.validate()?;

    let addr: SocketAddr = config
        .gateway
        .bind
        .parse()
        .map_err(|err| format!("invalid gateway.bind: {err}"))?;
    let provider = ProviderClient::new(
        config.gateway.provider_url.clone(),
        config.gateway.timeout_ms,
        config.symbols.pairs.clone(),
    )?;

    tracing::info!(
        provider_url = %config.gateway.provider_url,
        pairs = config.symbols.pairs.len(),
        "gateway configured"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to init tokio runtime: {err}"))?;
    runtime.block_on(server::serve(
        addr,
        server::AppState {
            source: Arc::new(provider),
        },
    ))
}

fn init_tracing() -> Result<(), String> {
    let filter = std::env::var("FXBOARD_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

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
