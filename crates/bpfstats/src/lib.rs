//! Top-level facade crate for bpfstats.
//!
//! Re-exports core types and the exporter library so users can depend on a single crate.

pub mod core {
    pub use bpfstats_core::*;
}

pub mod exporter {
    pub use bpfstats_exporter::*;
}

pub use bpfstats_core::{LabelSet, Result, StatsError};
pub use bpfstats_exporter::{IncrementInstrument, MetricsProvider, PrometheusProvider, SetInstrument};
