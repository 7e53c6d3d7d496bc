use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// A raw counter sample paired with the monotonic instant it was taken at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedSample<S> {
    pub sample: S,
    pub captured_at: Instant,
}

impl<S> CapturedSample<S> {
    pub fn new(sample: S, captured_at: Instant) -> Self {
        Self {
            sample,
            captured_at,
        }
    }
}

type Slot<S> = Arc<Mutex<Option<CapturedSample<S>>>>;

/// Latest captured sample per subject key.
///
/// Each key owns its own mutex, so a read-modify-write on one subject is
/// atomic while different subjects never contend. The outer lock is only
/// held long enough to find or create a key's slot. Entries live as long as
/// the store.
pub struct SampleStore<S> {
    slots: RwLock<HashMap<String, Slot<S>>>,
}

impl<S: Copy> SampleStore<S> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &str) -> Slot<S> {
        if let Some(slot) = self.slots.read().get(key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    /// Run `f` with exclusive access to the entry for `key`
    pub fn with_entry<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut Option<CapturedSample<S>>) -> R,
    ) -> R {
        let slot = self.slot(key);
        let mut entry = slot.lock();
        f(&mut entry)
    }

    /// Most recent sample stored for `key`
    pub fn latest(&self, key: &str) -> Option<CapturedSample<S>> {
        let slot = self.slots.read().get(key).cloned()?;
        let entry = slot.lock();
        *entry
    }

    pub fn contains(&self, key: &str) -> bool {
        self.latest(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Copy> Default for SampleStore<S> {
    fn default() -> Self {
        Self::new()
    }
}
