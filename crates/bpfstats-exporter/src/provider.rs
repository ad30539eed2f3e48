//! Metrics provider: instrument factory plus the exposition listener lifecycle.
//!
//! Lifecycle:
//! - `start` binds the listener before spawning anything, so a taken port is
//!   reported to the caller and nothing is left running.
//! - Two tasks cooperate through one `CancellationToken`: the axum server
//!   (graceful shutdown on the token) and a supervisor that, once the token
//!   fires, gives in-flight scrapes `shutdown_timeout_ms` before aborting.
//! - Cancelling the token twice, or calling `shutdown` twice, is a no-op.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use bpfstats_core::error::{Result, StatsError};

use crate::config::ExporterConfig;
use crate::instruments::{
    Gauge, IncrementCounter, IncrementInstrument, KeyedGauge, SetCounter, SetInstrument,
};
use crate::registry::Registry;
use crate::router::build_router;

/// Factory for named instruments. Names are unique per provider across all
/// instrument kinds.
pub trait MetricsProvider: Send + Sync {
    /// Absolute-value counter; only deltas reach the backend.
    fn new_set_counter(&self, name: &str) -> Result<Arc<dyn SetInstrument>>;

    /// +1 per call.
    fn new_increment_counter(&self, name: &str) -> Result<Arc<dyn IncrementInstrument>>;

    /// Single-slot gauge (see [`Gauge`] for the label caveat).
    fn new_gauge(&self, name: &str) -> Result<Arc<dyn SetInstrument>>;

    /// Gauge keeping one value per label set.
    fn new_keyed_gauge(&self, name: &str) -> Result<Arc<dyn SetInstrument>>;
}

/// Provider backed by the in-process registry and a Prometheus text endpoint.
pub struct PrometheusProvider {
    registry: Arc<Registry>,
    local_addr: Option<SocketAddr>,
    shutdown: CancellationToken,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl PrometheusProvider {
    /// Bind the exposition listener and start serving until `shutdown` fires.
    pub async fn start(cfg: ExporterConfig, shutdown: CancellationToken) -> Result<Self> {
        cfg.validate()?;

        let addr = format!("{}:{}", cfg.listen_host, cfg.port);
        let listener = TcpListener::bind((cfg.listen_host.as_str(), cfg.port))
            .await
            .map_err(|source| StatsError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| StatsError::Internal(format!("listener has no local address: {e}")))?;

        let registry = Arc::new(Registry::with_namespace(cfg.namespace.clone()));
        let app = build_router(Arc::clone(&registry), &cfg.path);

        let token = shutdown.clone();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
        });

        let token = shutdown.clone();
        let timeout = cfg.shutdown_timeout();
        let supervisor = tokio::spawn(async move {
            tokio::select! {
                res = &mut server => log_server_exit(res),
                _ = token.cancelled() => {
                    match tokio::time::timeout(timeout, &mut server).await {
                        Ok(res) => log_server_exit(res),
                        Err(_) => {
                            tracing::warn!(
                                timeout_ms = timeout.as_millis() as u64,
                                "in-flight scrapes outlived shutdown timeout; aborting listener"
                            );
                            server.abort();
                        }
                    }
                }
            }
        });

        tracing::info!(%local_addr, path = %cfg.path, "metrics exposition listening");

        Ok(Self {
            registry,
            local_addr: Some(local_addr),
            shutdown,
            supervisor: Mutex::new(Some(supervisor)),
        })
    }

    /// Provider without a listener, for mounting `ops::metrics` into an
    /// existing router via [`PrometheusProvider::registry`].
    pub fn detached(namespace: Option<String>) -> Self {
        Self {
            registry: Arc::new(Registry::with_namespace(namespace)),
            local_addr: None,
            shutdown: CancellationToken::new(),
            supervisor: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Bound listener address (`None` for detached providers).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Whether the exposition listener is still being served.
    pub fn is_running(&self) -> bool {
        match self.supervisor.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|h| !h.is_finished()),
            Err(_) => false,
        }
    }

    /// Cancel the token and wait (bounded by the shutdown timeout) for the
    /// listener to close.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let handle = self.supervisor.lock().ok().and_then(|mut g| g.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "exposition supervisor ended abnormally");
            }
        }
    }
}

fn log_server_exit(res: std::result::Result<std::io::Result<()>, JoinError>) {
    match res {
        Ok(Ok(())) => tracing::info!("metrics exposition stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "metrics exposition server failed"),
        Err(e) => tracing::error!(error = %e, "metrics exposition task failed"),
    }
}

impl MetricsProvider for PrometheusProvider {
    fn new_set_counter(&self, name: &str) -> Result<Arc<dyn SetInstrument>> {
        let counter = self.registry.register_counter(name)?;
        Ok(Arc::new(SetCounter::new(counter)))
    }

    fn new_increment_counter(&self, name: &str) -> Result<Arc<dyn IncrementInstrument>> {
        let counter = self.registry.register_counter(name)?;
        Ok(Arc::new(IncrementCounter::new(counter)))
    }

    fn new_gauge(&self, name: &str) -> Result<Arc<dyn SetInstrument>> {
        let gauge = Gauge::new();
        self.registry.register_gauge(name, gauge.observer())?;
        Ok(Arc::new(gauge))
    }

    fn new_keyed_gauge(&self, name: &str) -> Result<Arc<dyn SetInstrument>> {
        let gauge = KeyedGauge::new();
        self.registry.register_gauge(name, gauge.observer())?;
        Ok(Arc::new(gauge))
    }
}
