use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use bpfstats_core::LabelSet;

use super::render::{write_sample, write_type};
use super::Int64Counter;

/// Counter series keyed by label set. Adds are signed; the instrument layer
/// decides what a negative delta means.
#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelSet, AtomicI64>,
}

impl CounterVec {
    pub fn new() -> Self {
        Self { map: DashMap::new() }
    }

    /// Add a signed delta to the series for `labels`.
    pub fn add(&self, labels: &LabelSet, v: i64) {
        // Fast path: existing series only needs a shard read lock.
        if let Some(counter) = self.map.get(labels) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self
            .map
            .entry(labels.clone())
            .or_insert_with(|| AtomicI64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current total for `labels`, if that series was ever written.
    pub fn value(&self, labels: &LabelSet) -> Option<i64> {
        self.map.get(labels).map(|c| c.load(Ordering::Relaxed))
    }

    pub fn series_count(&self) -> usize {
        self.map.len()
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        write_type(out, name, "counter");

        let mut series: Vec<(LabelSet, i64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));

        for (labels, val) in &series {
            write_sample(out, name, labels, *val);
        }
    }
}

impl Int64Counter for CounterVec {
    fn add(&self, delta: i64, labels: &LabelSet) {
        CounterVec::add(self, labels, delta);
    }
}
