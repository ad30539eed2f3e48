use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bpfstats_core::error::{Result, StatsError};
use bpfstats_core::{LabelKey, LabelSet};

use super::{IncrementInstrument, SetInstrument};
use crate::registry::Int64Counter;

/// Presents "current absolute value" semantics over a counter that can only
/// be added to.
///
/// The last value set for each label set is remembered; each `set` forwards
/// only the delta from it, so the backend total always equals the last value.
/// Repeating the current value makes no backend call.
pub struct SetCounter {
    counter: Arc<dyn Int64Counter>,
    last: Mutex<HashMap<LabelKey, i64>>,
}

impl SetCounter {
    pub fn new(counter: Arc<dyn Int64Counter>) -> Self {
        Self {
            counter,
            last: Mutex::new(HashMap::new()),
        }
    }

    /// Last value set for `labels` (0 if never set).
    pub fn last_value(&self, labels: &LabelSet) -> Result<i64> {
        let key = labels.key()?;
        let last = self.state()?;
        Ok(last.get(&key).copied().unwrap_or(0))
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, HashMap<LabelKey, i64>>> {
        // A poisoned map may hold a value whose delta never reached the
        // backend; refuse further updates instead of guessing.
        self.last
            .lock()
            .map_err(|_| StatsError::Internal("set counter state poisoned".into()))
    }
}

impl SetInstrument for SetCounter {
    fn set(&self, value: i64, labels: &LabelSet) -> Result<()> {
        labels.validate()?;
        let key = labels.key()?;

        // lookup + delta + store + add form one critical section per instrument.
        let mut last = self.state()?;
        let previous = last.get(&key).copied().unwrap_or(0);
        if value == previous {
            return Ok(());
        }

        let delta = value
            .checked_sub(previous)
            .ok_or(StatsError::Overflow { previous, value })?;
        last.insert(key, value);
        self.counter.add(delta, labels);
        Ok(())
    }
}

/// Adds exactly 1 per call. Stateless.
pub struct IncrementCounter {
    counter: Arc<dyn Int64Counter>,
}

impl IncrementCounter {
    pub fn new(counter: Arc<dyn Int64Counter>) -> Self {
        Self { counter }
    }
}

impl IncrementInstrument for IncrementCounter {
    fn increment(&self, labels: &LabelSet) -> Result<()> {
        labels.validate()?;
        self.counter.add(1, labels);
        Ok(())
    }
}
