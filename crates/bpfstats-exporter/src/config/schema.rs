use std::time::Duration;

use serde::Deserialize;

use bpfstats_core::error::{Result, StatsError};

use crate::registry::validate_metric_name;
use crate::router::HEALTHZ_PATH;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterConfig,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterConfig::default(),
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StatsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.exporter.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    /// 0 lets the OS pick a free port.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_path")]
    pub path: String,

    /// Prefix for every exported metric name (`{namespace}_{name}`).
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            port: default_port(),
            path: default_path(),
            namespace: None,
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.listen_host.trim().is_empty() {
            return Err(StatsError::Config("exporter.listen_host must not be empty".into()));
        }
        if !self.path.starts_with('/') {
            return Err(StatsError::Config(
                "exporter.path must start with '/'".into(),
            ));
        }
        if self.path == HEALTHZ_PATH {
            return Err(StatsError::Config(format!(
                "exporter.path must not shadow {HEALTHZ_PATH}"
            )));
        }
        if !(100..=60000).contains(&self.shutdown_timeout_ms) {
            return Err(StatsError::Config(
                "exporter.shutdown_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if let Some(ns) = &self.namespace {
            validate_metric_name(ns).map_err(|_| {
                StatsError::Config(format!(
                    "exporter.namespace is not a valid metric name: {ns:?}"
                ))
            })?;
        }
        Ok(())
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

fn default_listen_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    9091
}
fn default_path() -> String {
    "/metrics".into()
}
fn default_shutdown_timeout_ms() -> u64 {
    5000
}
