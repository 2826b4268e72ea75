// file: src/cache/inflight.rs
// description: serializes cache population so each normalized query is fetched at most once at a time
// reference: https://docs.rs/tokio/latest/tokio/sync/struct.Mutex.html

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

type Slots = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

#[derive(Default)]
pub struct InflightRegistry {
    slots: Arc<Slots>,
}

/// Held while a query's result is being populated. Dropping it lets the next waiter in.
pub struct PopulationGuard {
    key: String,
    slots: Arc<Slots>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> PopulationGuard {
        let slot = {
            let mut slots = lock(&self.slots);
            slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        if slot.try_lock().is_err() {
            debug!("Waiting for in-flight lookup of \"{}\"", key);
        }

        let guard = slot.lock_owned().await;

        PopulationGuard {
            key: key.to_string(),
            slots: self.slots.clone(),
            guard: Some(guard),
        }
    }

    pub fn in_flight(&self) -> usize {
        lock(&self.slots).len()
    }
}

impl Drop for PopulationGuard {
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        // the map and this guard hold the only references when nobody is waiting
        let idle = slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) <= 2);
        if idle {
            slots.remove(&self.key);
        }
        self.guard.take();
    }
}

fn lock(slots: &Slots) -> std::sync::MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
