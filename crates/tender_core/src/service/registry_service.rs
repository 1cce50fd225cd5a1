//! Tender registry use-case service.
//!
//! # Responsibility
//! - Combine the owner gate and the ledger into the public registry API.
//! - Emit notifications for committed mutations.
//!
//! # Invariants
//! - Owner check, id allocation and insertion run inside one write-lock
//!   critical section; a rejected call leaves no trace.
//! - Queries clone from a read-locked snapshot and never observe a
//!   half-applied mutation.
//! - Events are queued inside the same critical section as the mutation
//!   and delivered in that order after the lock is released.
//! - Observers cannot fail a call.

use crate::access::owner::{AccessError, OwnerGuard};
use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::content::content_hash;
use crate::events::{EventDispatcher, RegistryEvent, RegistryObserver};
use crate::model::tender::{Identity, NewTender, Proposal, Tender, TenderId};
use crate::repo::ledger_repo::{
    InMemoryTenderLedger, LedgerError, TenderLedger, TenderListQuery,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Owner-gated operation invoked by another identity.
    AccessDenied { caller: Identity },
    /// Referenced tender id does not exist.
    TenderNotFound(TenderId),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied { caller } => {
                write!(f, "access denied: {caller} is not the registry owner")
            }
            Self::TenderNotFound(id) => write!(f, "tender not found: {id}"),
        }
    }
}

impl Error for RegistryError {}

impl From<AccessError> for RegistryError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::AccessDenied { caller } => Self::AccessDenied { caller },
        }
    }
}

impl From<LedgerError> for RegistryError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::TenderNotFound(id) => Self::TenderNotFound(id),
        }
    }
}

struct RegistryState<L> {
    guard: OwnerGuard,
    ledger: L,
}

/// Shared tender registry. Safe to use from many threads through `&self`.
pub struct TenderRegistry<L: TenderLedger = InMemoryTenderLedger> {
    state: RwLock<RegistryState<L>>,
    events: EventDispatcher,
    clock: Arc<dyn Clock>,
}

impl TenderRegistry<InMemoryTenderLedger> {
    /// Creates an empty in-memory registry owned by `owner`.
    pub fn new(owner: Identity) -> Self {
        Self::with_ledger(owner, InMemoryTenderLedger::new())
    }

    /// Creates an empty in-memory registry from loaded configuration.
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.owner.clone())
    }
}

impl<L: TenderLedger> TenderRegistry<L> {
    /// Creates a registry over an existing ledger implementation.
    pub fn with_ledger(owner: Identity, ledger: L) -> Self {
        info!(
            "event=registry_init module=registry status=ok owner={} tenders={}",
            owner,
            ledger.tender_count()
        );
        Self {
            state: RwLock::new(RegistryState {
                guard: OwnerGuard::new(owner),
                ledger,
            }),
            events: EventDispatcher::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source used for ledger timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registers an observer for all subsequent notifications.
    pub fn subscribe(&self, observer: Arc<dyn RegistryObserver>) {
        self.events.subscribe(observer);
    }

    pub fn current_owner(&self) -> Identity {
        self.read_state().guard.current_owner().clone()
    }

    /// Publishes a tender. Owner only.
    ///
    /// # Contract
    /// - Returns `count(tenders) + 1` as the new id.
    /// - Emits `TenderCreated { id, code }`.
    /// - Non-owners get `AccessDenied`; no id is consumed.
    pub fn create_tender(
        &self,
        caller: &Identity,
        code: impl Into<String>,
        description: impl Into<String>,
        document_hash: impl Into<String>,
    ) -> RegistryResult<TenderId> {
        self.publish(caller, NewTender::new(code, description, document_hash))
    }

    /// Same as [`TenderRegistry::create_tender`] with a prepared request.
    pub fn publish(&self, caller: &Identity, draft: NewTender) -> RegistryResult<TenderId> {
        let code = draft.code.clone();
        let id = {
            let mut state = self.write_state();
            if let Err(err) = state.guard.require_owner(caller) {
                warn!(
                    "event=tender_create module=registry status=rejected error_code=access_denied caller={}",
                    caller
                );
                return Err(err.into());
            }
            let created_at_ms = self.clock.now_epoch_ms();
            let id = state
                .ledger
                .create_tender(draft, caller.clone(), created_at_ms)?;
            self.events.enqueue(RegistryEvent::TenderCreated {
                id,
                code: code.clone(),
            });
            id
        };

        info!(
            "event=tender_create module=registry status=ok tender_id={} code={}",
            id, code
        );
        self.events.deliver_pending();
        Ok(id)
    }

    /// Appends a proposal from `caller` to tender `tender_id`. Open to anyone.
    ///
    /// # Contract
    /// - Emits `ProposalSubmitted { tender_id, proposer }`.
    /// - Unknown ids get `TenderNotFound`; nothing is appended.
    pub fn submit_proposal(
        &self,
        caller: &Identity,
        tender_id: TenderId,
        proposal_hash: impl Into<String>,
    ) -> RegistryResult<()> {
        let proposal_hash: String = proposal_hash.into();
        let position = {
            let mut state = self.write_state();
            let proposal = Proposal::new(caller.clone(), proposal_hash, self.clock.now_epoch_ms());
            match state.ledger.append_proposal(tender_id, proposal) {
                Ok(position) => {
                    self.events.enqueue(RegistryEvent::ProposalSubmitted {
                        tender_id,
                        proposer: caller.clone(),
                    });
                    position
                }
                Err(err) => {
                    warn!(
                        "event=proposal_submit module=registry status=rejected error_code=tender_not_found tender_id={} caller={}",
                        tender_id, caller
                    );
                    return Err(err.into());
                }
            }
        };

        info!(
            "event=proposal_submit module=registry status=ok tender_id={} proposer={} position={}",
            tender_id, caller, position
        );
        self.events.deliver_pending();
        Ok(())
    }

    /// Hashes `document` and submits the hash as a proposal.
    ///
    /// Returns the content hash that was recorded.
    pub fn submit_proposal_document(
        &self,
        caller: &Identity,
        tender_id: TenderId,
        document: &[u8],
    ) -> RegistryResult<String> {
        let proposal_hash = content_hash(document);
        self.submit_proposal(caller, tender_id, proposal_hash.clone())?;
        Ok(proposal_hash)
    }

    /// Hands ownership to `new_owner`. Owner only.
    pub fn transfer_ownership(&self, caller: &Identity, new_owner: Identity) -> RegistryResult<()> {
        let previous_owner = {
            let mut state = self.write_state();
            match state.guard.transfer(caller, new_owner.clone()) {
                Ok(previous) => {
                    self.events.enqueue(RegistryEvent::OwnershipTransferred {
                        previous_owner: previous.clone(),
                        new_owner: new_owner.clone(),
                    });
                    previous
                }
                Err(err) => {
                    warn!(
                        "event=ownership_transfer module=registry status=rejected error_code=access_denied caller={}",
                        caller
                    );
                    return Err(err.into());
                }
            }
        };

        info!(
            "event=ownership_transfer module=registry status=ok previous_owner={} new_owner={}",
            previous_owner, new_owner
        );
        self.events.deliver_pending();
        Ok(())
    }

    pub fn get_tender(&self, tender_id: TenderId) -> RegistryResult<Tender> {
        Ok(self.read_state().ledger.get_tender(tender_id)?)
    }

    /// Proposals in submission order; empty when the tender has none.
    pub fn get_proposals(&self, tender_id: TenderId) -> RegistryResult<Vec<Proposal>> {
        Ok(self.read_state().ledger.get_proposals(tender_id)?)
    }

    pub fn tender_count(&self) -> u64 {
        self.read_state().ledger.tender_count()
    }

    /// Tenders in id order, paginated by `query`.
    pub fn list_tenders(&self, query: &TenderListQuery) -> Vec<Tender> {
        self.read_state().ledger.list_tenders(query)
    }

    // Mutations never leave partial state, so a poisoned lock still guards
    // consistent data.
    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState<L>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState<L>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
