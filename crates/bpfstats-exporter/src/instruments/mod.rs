//! Caller-facing instruments.
//!
//! - [`SetCounter`]: "set to absolute value" over a signed-delta counter.
//! - [`IncrementCounter`]: +1 per call.
//! - [`Gauge`]: one shared (value, labels) slot, pulled at scrape.
//! - [`KeyedGauge`]: one (value, labels) slot per label set.

mod counter;
mod gauge;

use bpfstats_core::{LabelSet, Result};

pub use counter::{IncrementCounter, SetCounter};
pub use gauge::{Gauge, KeyedGauge};

/// Instruments reporting an absolute value.
pub trait SetInstrument: Send + Sync {
    fn set(&self, value: i64, labels: &LabelSet) -> Result<()>;
}

/// Instruments counting occurrences.
pub trait IncrementInstrument: Send + Sync {
    fn increment(&self, labels: &LabelSet) -> Result<()>;
}
