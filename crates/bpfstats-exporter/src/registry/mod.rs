//! In-process metrics backend.
//!
//! Counters accept signed adds and are keyed by label set; gauges are pulled
//! from callbacks registered by name and sampled on every scrape. Both are
//! rendered in Prometheus text exposition format by `/metrics`.
//!
//! The instruments only see the backend through two seams:
//! - [`Int64Counter`]: signed add under a label set.
//! - [`ObserveFn`]: a sampling callback handed over at registration.

mod counter;
mod gauge;
mod render;

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use bpfstats_core::error::{Result, StatsError};
use bpfstats_core::LabelSet;

pub use counter::CounterVec;
pub use gauge::{ObservableGauge, ObserveFn, Observation};

/// Backend counter primitive.
pub trait Int64Counter: Send + Sync {
    fn add(&self, delta: i64, labels: &LabelSet);
}

#[derive(Clone)]
enum Metric {
    Counter(Arc<CounterVec>),
    Gauge(Arc<ObservableGauge>),
}

/// Named metrics, unique per registry across all kinds.
#[derive(Default)]
pub struct Registry {
    namespace: Option<String>,
    metrics: DashMap<String, Metric>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose exported names are prefixed with `{namespace}_`.
    pub fn with_namespace(namespace: Option<String>) -> Self {
        Self {
            namespace,
            metrics: DashMap::new(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Register a counter under `name`.
    pub fn register_counter(&self, name: &str) -> Result<Arc<CounterVec>> {
        let counter = Arc::new(CounterVec::new());
        self.insert(name, Metric::Counter(Arc::clone(&counter)))?;
        Ok(counter)
    }

    /// Register a gauge sampled through `callback` under `name`.
    pub fn register_gauge(&self, name: &str, callback: ObserveFn) -> Result<()> {
        let gauge = Arc::new(ObservableGauge::new(callback));
        self.insert(name, Metric::Gauge(gauge))
    }

    fn insert(&self, name: &str, metric: Metric) -> Result<()> {
        validate_metric_name(name)?;
        let full = self.full_name(name);
        // Catches a namespace that is not itself a valid name prefix.
        validate_metric_name(&full)?;
        match self.metrics.entry(full) {
            Entry::Occupied(e) => Err(StatsError::Duplicate(e.key().clone())),
            Entry::Vacant(e) => {
                tracing::debug!(name = %e.key(), "metric registered");
                e.insert(metric);
                Ok(())
            }
        }
    }

    fn full_name(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}_{name}"),
            None => name.to_string(),
        }
    }

    /// Current counter total for `labels` (name without namespace prefix).
    pub fn counter_value(&self, name: &str, labels: &LabelSet) -> Option<i64> {
        match self.metrics.get(&self.full_name(name))?.value() {
            Metric::Counter(c) => c.value(labels),
            Metric::Gauge(_) => None,
        }
    }

    /// Sample a gauge the way a scrape would (name without namespace prefix).
    pub fn observe_gauge(&self, name: &str) -> Option<Vec<Observation>> {
        let gauge = match self.metrics.get(&self.full_name(name))?.value() {
            Metric::Gauge(g) => Arc::clone(g),
            Metric::Counter(_) => return None,
        };
        Some(gauge.observe())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Render all registered metrics, sorted by name.
    pub fn render(&self) -> String {
        // Snapshot first: gauge callbacks run without any map guard held.
        let mut metrics: Vec<(String, Metric)> = self
            .metrics
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        metrics.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = String::new();
        for (name, metric) in &metrics {
            match metric {
                Metric::Counter(c) => c.render(name, &mut out),
                Metric::Gauge(g) => g.render(name, &mut out),
            }
        }
        out
    }
}

/// Metric names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StatsError::InvalidName(name.to_string()))
    }
}
