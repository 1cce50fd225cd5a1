//! Observer contract and built-in observers.

use super::RegistryEvent;
use log::{error, info};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives registry notifications after a mutation has committed.
///
/// Implementations must return quickly; they run on a registry caller's
/// thread with no registry lock held.
pub trait RegistryObserver: Send + Sync {
    fn on_event(&self, event: &RegistryEvent);
}

/// Ordered collection of observers.
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivers `event` to every observer in registration order.
    pub fn dispatch(&self, event: &RegistryEvent) {
        for (index, observer) in self.observers.iter().enumerate() {
            let delivered = catch_unwind(AssertUnwindSafe(|| observer.on_event(event)));
            if delivered.is_err() {
                error!(
                    "event=observer_dispatch module=events status=error observer_index={} notification={}",
                    index,
                    event.name()
                );
            }
        }
    }
}

/// In-memory recorder, mostly useful for tests and CLI output.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<RegistryEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<RegistryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl RegistryObserver for EventLog {
    fn on_event(&self, event: &RegistryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl RegistryObserver for LoggingObserver {
    fn on_event(&self, event: &RegistryEvent) {
        match event {
            RegistryEvent::TenderCreated { id, code } => info!(
                "event=tender_created module=registry status=ok tender_id={} code={}",
                id, code
            ),
            RegistryEvent::ProposalSubmitted {
                tender_id,
                proposer,
            } => info!(
                "event=proposal_submitted module=registry status=ok tender_id={} proposer={}",
                tender_id, proposer
            ),
            RegistryEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => info!(
                "event=ownership_transferred module=registry status=ok previous_owner={} new_owner={}",
                previous_owner, new_owner
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventLog, ObserverSet, RegistryObserver};
    use crate::events::RegistryEvent;
    use crate::model::tender::TenderId;
    use std::sync::Arc;

    struct Exploding;

    impl RegistryObserver for Exploding {
        fn on_event(&self, _event: &RegistryEvent) {
            panic!("observer failure");
        }
    }

    fn created(id: u64) -> RegistryEvent {
        RegistryEvent::TenderCreated {
            id: TenderId::new(id),
            code: format!("C-{id}"),
        }
    }

    #[test]
    fn dispatch_reaches_observers_in_order() {
        let log = Arc::new(EventLog::new());
        let mut set = ObserverSet::new();
        set.push(log.clone());

        set.dispatch(&created(1));
        set.dispatch(&created(2));

        assert_eq!(log.snapshot(), vec![created(1), created(2)]);
        assert_eq!(log.drain().len(), 2);
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn panicking_observer_does_not_stop_the_rest() {
        let log = Arc::new(EventLog::new());
        let mut set = ObserverSet::new();
        set.push(Arc::new(Exploding));
        set.push(log.clone());
        assert_eq!(set.len(), 2);

        set.dispatch(&created(1));

        assert_eq!(log.snapshot(), vec![created(1)]);
    }

    #[test]
    fn events_serialize_with_tag() {
        let value = serde_json::to_value(created(7)).unwrap();
        assert_eq!(value["event"], "tender_created");
        assert_eq!(value["id"], 7);
        assert_eq!(value["code"], "C-7");
    }
}
