//! Commit-ordered event delivery.
//!
//! Mutations enqueue their event while still holding the registry write
//! lock, so queue order is commit order. Delivery happens after that lock
//! is released: whichever caller acquires the delivery slot drains the
//! queue, the others return and leave their events to it.

use super::{ObserverSet, RegistryEvent, RegistryObserver};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};

#[derive(Default)]
pub struct EventDispatcher {
    observers: RwLock<ObserverSet>,
    pending: Mutex<VecDeque<RegistryEvent>>,
    delivering: Mutex<()>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer`; it hears every event delivered afterwards.
    pub fn subscribe(&self, observer: Arc<dyn RegistryObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Queues `event`. Callers must hold the lock that serialises commits.
    pub fn enqueue(&self, event: RegistryEvent) {
        self.pending().push_back(event);
    }

    /// Delivers queued events in order unless another caller already is.
    ///
    /// Observers run with no registry lock held; they may query, mutate or
    /// subscribe. Events they cause are delivered after the current one.
    pub fn deliver_pending(&self) {
        loop {
            let slot = match self.delivering.try_lock() {
                Ok(slot) => slot,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => return,
            };

            while let Some(event) = self.pending().pop_front() {
                let observers = self
                    .observers
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                observers.dispatch(&event);
            }
            drop(slot);

            // An event queued between the last pop and the release would
            // otherwise wait for the next mutation.
            if self.pending().is_empty() {
                return;
            }
        }
    }

    fn pending(&self) -> MutexGuard<'_, VecDeque<RegistryEvent>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
