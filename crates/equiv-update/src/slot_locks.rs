//! Keyed locks: one holder per slot, contenders block until release.

use std::sync::{Arc, Condvar, Mutex};

use dashmap::DashMap;
use equiv_core::errors::StoreError;
use equiv_core::{EquivError, EquivResult};
use tracing::trace;

#[derive(Default)]
struct Slot {
    held: Mutex<bool>,
    released: Condvar,
}

type Slots = Arc<DashMap<String, Arc<Slot>>>;

/// Registry of slot locks keyed by an external id (a programme slot, a
/// subject id). A slot lives only while someone holds or waits on it.
#[derive(Default)]
pub struct SlotLocks {
    slots: Slots,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots currently held or waited on.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Block until `key` is free, then hold it until the guard drops.
    pub fn acquire(&self, key: &str) -> EquivResult<SlotGuard> {
        let slot = Arc::clone(self.slots.entry(key.to_string()).or_default().value());
        {
            let mut held = slot.held.lock().map_err(|e| poisoned(key, e))?;
            while *held {
                trace!(key, "waiting for slot");
                held = slot.released.wait(held).map_err(|e| poisoned(key, e))?;
            }
            *held = true;
        }
        Ok(SlotGuard {
            key: key.to_string(),
            slot,
            slots: Arc::clone(&self.slots),
        })
    }

    /// Hold `key` only if nobody else does.
    pub fn try_acquire(&self, key: &str) -> EquivResult<Option<SlotGuard>> {
        let slot = Arc::clone(self.slots.entry(key.to_string()).or_default().value());
        {
            let mut held = slot.held.lock().map_err(|e| poisoned(key, e))?;
            if *held {
                drop(held);
                drop(slot);
                release_if_idle(&self.slots, key);
                return Ok(None);
            }
            *held = true;
        }
        Ok(Some(SlotGuard {
            key: key.to_string(),
            slot,
            slots: Arc::clone(&self.slots),
        }))
    }

    pub fn is_held(&self, key: &str) -> bool {
        let Some(slot) = self.slots.get(key).map(|s| Arc::clone(s.value())) else {
            return false;
        };
        let held = slot.held.lock().map(|held| *held).unwrap_or(false);
        held
    }
}

fn poisoned(key: &str, e: impl std::fmt::Display) -> EquivError {
    StoreError::Unavailable {
        collaborator: "slot locks".into(),
        reason: format!("slot {key} lock poisoned: {e}"),
    }
    .into()
}

/// Drop the map's slot for `key` when only the map still points at it.
///
/// Contenders clone the slot under the shard lock `remove_if` also takes, so
/// a slot with a waiter is never removed.
fn release_if_idle(slots: &DashMap<String, Arc<Slot>>, key: &str) {
    slots.remove_if(key, |_, slot| Arc::strong_count(slot) == 1);
}

/// Releases its slot and wakes one waiter on drop.
pub struct SlotGuard {
    key: String,
    slot: Arc<Slot>,
    slots: Slots,
}

impl SlotGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if let Ok(mut held) = self.slot.held.lock() {
            *held = false;
        }
        self.slot.released.notify_one();
        // Swap our handle for a detached one so only the map counts.
        self.slot = Arc::new(Slot::default());
        release_if_idle(&self.slots, &self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn second_holder_waits_for_release() {
        let locks = Arc::new(SlotLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (locks, inside, max_inside) = (locks.clone(), inside.clone(), max_inside.clone());
                thread::spawn(move || {
                    let _guard = locks.acquire("slot-1").unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(!locks.is_held("slot-1"));
    }

    #[test]
    fn released_slots_leave_the_registry() {
        let locks = Arc::new(SlotLocks::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let locks = locks.clone();
                thread::spawn(move || {
                    let _guard = locks.acquire(&format!("subject-{}", i % 3)).unwrap();
                    thread::sleep(Duration::from_millis(2));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(locks.is_empty());

        let held = locks.acquire("x").unwrap();
        assert!(locks.try_acquire("x").unwrap().is_none());
        assert_eq!(locks.len(), 1);
        drop(held);
        assert!(locks.is_empty());
    }

    #[test]
    fn different_keys_do_not_contend() {
        let locks = SlotLocks::new();
        let _a = locks.acquire("a").unwrap();
        assert!(locks.try_acquire("b").unwrap().is_some());
        assert!(locks.try_acquire("a").unwrap().is_none());
    }
}
