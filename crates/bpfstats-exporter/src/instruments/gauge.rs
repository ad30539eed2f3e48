use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bpfstats_core::{LabelKey, LabelSet, Result};

use super::SetInstrument;
use crate::registry::{ObserveFn, Observation};

// Every write replaces the slot in one assignment, so a poisoned lock still
// guards a whole pair and is safe to recover.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        tracing::warn!("gauge lock poisoned; recovering");
        PoisonError::into_inner(poisoned)
    })
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        tracing::warn!("gauge lock poisoned; recovering");
        PoisonError::into_inner(poisoned)
    })
}

/// Latest-value gauge, sampled by the backend at scrape time.
///
/// **Single slot**: the gauge keeps one (value, labels) pair across all label
/// sets. Each `set` overwrites it whatever labels are passed, so a scrape
/// reports only the most recent pair. Use one `Gauge` per fixed label
/// combination, or [`KeyedGauge`] to keep one pair per label set.
///
/// Before the first `set` the gauge reports `0` with no labels.
#[derive(Default)]
pub struct Gauge {
    slot: Arc<RwLock<Observation>>,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current pair.
    pub fn snapshot(&self) -> Observation {
        read(&self.slot).clone()
    }

    /// Sampling callback to register with the backend.
    pub fn observer(&self) -> ObserveFn {
        let slot = Arc::clone(&self.slot);
        Box::new(move || vec![read(&slot).clone()])
    }
}

impl SetInstrument for Gauge {
    fn set(&self, value: i64, labels: &LabelSet) -> Result<()> {
        labels.validate()?;
        let next = Observation::new(value, labels.clone());
        *write(&self.slot) = next;
        Ok(())
    }
}

/// Latest-value gauge keeping one pair per distinct label set.
#[derive(Default)]
pub struct KeyedGauge {
    slots: Arc<RwLock<HashMap<LabelKey, Observation>>>,
}

impl KeyedGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// All current pairs, sorted by label set.
    pub fn snapshot(&self) -> Vec<Observation> {
        collect_sorted(&read(&self.slots))
    }

    pub fn observer(&self) -> ObserveFn {
        let slots = Arc::clone(&self.slots);
        Box::new(move || collect_sorted(&read(&slots)))
    }
}

fn collect_sorted(slots: &HashMap<LabelKey, Observation>) -> Vec<Observation> {
    let mut out: Vec<Observation> = slots.values().cloned().collect();
    out.sort_by(|a, b| a.labels.cmp(&b.labels));
    out
}

impl SetInstrument for KeyedGauge {
    fn set(&self, value: i64, labels: &LabelSet) -> Result<()> {
        labels.validate()?;
        let key = labels.key()?;
        let next = Observation::new(value, labels.clone());
        write(&self.slots).insert(key, next);
        Ok(())
    }
}
