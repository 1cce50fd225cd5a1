//! Registry notifications and observer fan-out.
//!
//! # Responsibility
//! - Define the events emitted after successful registry mutations.
//! - Deliver events to registered observers without letting them affect
//!   the mutation that produced the event.
//!
//! # Invariants
//! - Events are only dispatched for committed mutations.
//! - A panicking observer is isolated; remaining observers still run.
//! - Observers receive events in commit order.

mod dispatcher;
mod observer;

pub use dispatcher::EventDispatcher;
pub use observer::{EventLog, LoggingObserver, ObserverSet, RegistryObserver};

use crate::model::tender::{Identity, TenderId};
use serde::{Deserialize, Serialize};

/// Notification emitted by a committed registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    TenderCreated {
        id: TenderId,
        code: String,
    },
    ProposalSubmitted {
        tender_id: TenderId,
        proposer: Identity,
    },
    OwnershipTransferred {
        previous_owner: Identity,
        new_owner: Identity,
    },
}

impl RegistryEvent {
    /// Stable snake_case name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TenderCreated { .. } => "tender_created",
            Self::ProposalSubmitted { .. } => "proposal_submitted",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }
}
