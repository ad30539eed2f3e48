//! bpfstats exporter library entry.
//!
//! Wires the backend registry, the set/increment/gauge instruments, and the
//! Prometheus exposition listener into one provider. Consumed by the binary
//! (`main.rs`), by the facade crate, and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod instruments;
pub mod ops;
pub mod provider;
pub mod registry;
pub mod router;

pub use instruments::{Gauge, IncrementCounter, IncrementInstrument, KeyedGauge, SetCounter, SetInstrument};
pub use provider::{MetricsProvider, PrometheusProvider};
pub use registry::Registry;
