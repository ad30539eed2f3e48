use bpfstats_core::LabelSet;

use super::render::{write_sample, write_type};

/// One sampled data point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub value: i64,
    pub labels: LabelSet,
}

impl Observation {
    pub fn new(value: i64, labels: LabelSet) -> Self {
        Self { value, labels }
    }
}

/// Sampling callback, invoked on every scrape.
pub type ObserveFn = Box<dyn Fn() -> Vec<Observation> + Send + Sync>;

/// A gauge whose value is pulled from a callback at scrape time.
pub struct ObservableGauge {
    callback: ObserveFn,
}

impl ObservableGauge {
    pub fn new(callback: ObserveFn) -> Self {
        Self { callback }
    }

    pub fn observe(&self) -> Vec<Observation> {
        (self.callback)()
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        write_type(out, name, "gauge");
        for obs in self.observe() {
            write_sample(out, name, &obs.labels, obs.value);
        }
    }
}
