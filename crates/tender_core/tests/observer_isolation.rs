use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use tender_core::{
    EventLog, Identity, LoggingObserver, RegistryEvent, RegistryObserver, TenderId, TenderRegistry,
};

struct PanickingObserver;

impl RegistryObserver for PanickingObserver {
    fn on_event(&self, _event: &RegistryEvent) {
        panic!("observer blew up");
    }
}

#[derive(Default)]
struct CountingObserver {
    seen: AtomicUsize,
}

impl RegistryObserver for CountingObserver {
    fn on_event(&self, _event: &RegistryEvent) {
        self.seen.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reads registry state from inside a notification.
struct ReentrantObserver {
    registry: Arc<TenderRegistry>,
    counts: EventLog,
}

impl RegistryObserver for ReentrantObserver {
    fn on_event(&self, event: &RegistryEvent) {
        if let RegistryEvent::TenderCreated { id, .. } = event {
            let tender = self.registry.get_tender(*id).unwrap();
            assert_eq!(tender.id, *id);
        }
        self.counts.on_event(event);
    }
}

/// Holds the first `TenderCreated` delivery until released.
struct GateObserver {
    entered: Mutex<Option<Sender<()>>>,
    release: Mutex<Receiver<()>>,
}

impl RegistryObserver for GateObserver {
    fn on_event(&self, event: &RegistryEvent) {
        if !matches!(event, RegistryEvent::TenderCreated { .. }) {
            return;
        }
        if let Some(entered) = self.entered.lock().unwrap().take() {
            entered.send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
    }
}

/// Subscribes `late` from inside its first notification.
struct SubscribingObserver {
    registry: Arc<TenderRegistry>,
    late: Arc<EventLog>,
    done: AtomicUsize,
}

impl RegistryObserver for SubscribingObserver {
    fn on_event(&self, _event: &RegistryEvent) {
        if self.done.fetch_add(1, Ordering::SeqCst) == 0 {
            self.registry.subscribe(self.late.clone());
        }
    }
}

#[test]
fn failing_observer_cannot_fail_the_mutation() {
    let owner = Identity::new("0xA");
    let registry = TenderRegistry::new(owner.clone());
    let counter = Arc::new(CountingObserver::default());
    registry.subscribe(Arc::new(PanickingObserver));
    registry.subscribe(counter.clone());
    registry.subscribe(Arc::new(LoggingObserver));

    let id = registry.create_tender(&owner, "C", "d", "0x1").unwrap();
    registry
        .submit_proposal(&Identity::new("0xC"), id, "0xp")
        .unwrap();

    assert_eq!(id, TenderId::FIRST);
    assert_eq!(registry.get_proposals(id).unwrap().len(), 1);
    assert_eq!(counter.seen.load(Ordering::SeqCst), 2);
}

#[test]
fn observers_may_query_the_registry() {
    let owner = Identity::new("0xA");
    let registry = Arc::new(TenderRegistry::new(owner.clone()));
    let observer = Arc::new(ReentrantObserver {
        registry: Arc::clone(&registry),
        counts: EventLog::new(),
    });
    registry.subscribe(observer.clone());

    registry.create_tender(&owner, "C", "d", "0x1").unwrap();
    registry.create_tender(&owner, "D", "d", "0x1").unwrap();

    assert_eq!(observer.counts.snapshot().len(), 2);
}

#[test]
fn observers_only_hear_committed_mutations() {
    let owner = Identity::new("0xA");
    let registry = TenderRegistry::new(owner.clone());
    let counter = Arc::new(CountingObserver::default());
    registry.subscribe(counter.clone());

    registry
        .create_tender(&Identity::new("0xB"), "C", "d", "0x1")
        .unwrap_err();
    registry
        .submit_proposal(&Identity::new("0xC"), TenderId::new(1), "0xp")
        .unwrap_err();
    registry
        .transfer_ownership(&Identity::new("0xB"), Identity::new("0xB"))
        .unwrap_err();

    assert_eq!(counter.seen.load(Ordering::SeqCst), 0);
}

#[test]
fn slow_delivery_keeps_commit_order_across_threads() {
    let owner = Identity::new("0xA");
    let registry = Arc::new(TenderRegistry::new(owner.clone()));
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    registry.subscribe(Arc::new(GateObserver {
        entered: Mutex::new(Some(entered_tx)),
        release: Mutex::new(release_rx),
    }));
    let log = Arc::new(EventLog::new());
    registry.subscribe(log.clone());

    let creator = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || registry.create_tender(&owner, "C", "d", "0x1").unwrap())
    };
    entered_rx.recv().unwrap();

    let submitter = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            registry
                .submit_proposal(&Identity::new("0xC"), TenderId::FIRST, "0xp")
                .unwrap()
        })
    };
    submitter.join().unwrap();
    release_tx.send(()).unwrap();
    assert_eq!(creator.join().unwrap(), TenderId::FIRST);

    let names: Vec<_> = log.snapshot().iter().map(RegistryEvent::name).collect();
    assert_eq!(names, vec!["tender_created", "proposal_submitted"]);
}

#[test]
fn observers_may_subscribe_during_delivery() {
    let owner = Identity::new("0xA");
    let registry = Arc::new(TenderRegistry::new(owner.clone()));
    let late = Arc::new(EventLog::new());
    registry.subscribe(Arc::new(SubscribingObserver {
        registry: Arc::clone(&registry),
        late: late.clone(),
        done: AtomicUsize::new(0),
    }));

    let id = registry.create_tender(&owner, "C", "d", "0x1").unwrap();
    registry
        .submit_proposal(&Identity::new("0xC"), id, "0xp")
        .unwrap();

    let names: Vec<_> = late.snapshot().iter().map(RegistryEvent::name).collect();
    assert_eq!(names, vec!["proposal_submitted"]);
}
