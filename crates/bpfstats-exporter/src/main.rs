//! bpfstats exporter binary.
//!
//! - Config: first CLI argument, else `$BPFSTATS_CONFIG`, else `bpfstats.yaml`
//!   (defaults when the file does not exist)
//! - Prometheus endpoint on `exporter.port` / `exporter.path`
//! - Graceful shutdown on Ctrl+C / SIGTERM

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use bpfstats_core::{LabelSet, Result};
use bpfstats_exporter::config::{self, StatsConfig};
use bpfstats_exporter::{MetricsProvider, PrometheusProvider, SetInstrument};

const DEFAULT_CONFIG_PATH: &str = "bpfstats.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BPFSTATS_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let cfg = if Path::new(&path).exists() {
        config::load_from_file(&path)?
    } else {
        tracing::info!(%path, "config file not found, using defaults");
        StatsConfig::default()
    };

    let token = CancellationToken::new();
    let provider = PrometheusProvider::start(cfg.exporter, token.clone()).await?;

    let build_info = provider.new_gauge("bpfstats_build_info")?;
    build_info.set(1, &LabelSet::new().with("version", env!("CARGO_PKG_VERSION")))?;

    shutdown_signal().await;
    token.cancel();
    provider.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
