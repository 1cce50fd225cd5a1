//! Tender ledger contracts and in-memory implementation.
//!
//! # Responsibility
//! - Allocate sequential tender ids and store tender records.
//! - Append proposals to their parent tender.
//!
//! # Invariants
//! - Id allocation and insertion happen in one call; a failed call leaves
//!   no gap and no record behind.
//! - Proposal lists are append-only.
//! - Implementations perform no authorization; callers gate writes.

use crate::model::tender::{Identity, NewTender, Proposal, Tender, TenderId};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger lookup/mutation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    TenderNotFound(TenderId),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TenderNotFound(id) => write!(f, "tender not found: {id}"),
        }
    }
}

impl Error for LedgerError {}

/// Pagination options for listing tenders in id order.
#[derive(Debug, Clone, Default)]
pub struct TenderListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Storage interface for tenders and their proposals.
pub trait TenderLedger {
    fn tender_count(&self) -> u64;
    /// Allocates the next id and inserts the tender under it.
    fn create_tender(
        &mut self,
        draft: NewTender,
        created_by: Identity,
        created_at_ms: i64,
    ) -> LedgerResult<TenderId>;
    /// Appends to the tender's proposals. Returns the new proposal count.
    fn append_proposal(&mut self, id: TenderId, proposal: Proposal) -> LedgerResult<usize>;
    fn get_tender(&self, id: TenderId) -> LedgerResult<Tender>;
    fn get_proposals(&self, id: TenderId) -> LedgerResult<Vec<Proposal>>;
    fn list_tenders(&self, query: &TenderListQuery) -> Vec<Tender>;
}

/// Arena-style ledger: one ordered map from id to owned tender record.
#[derive(Debug, Default)]
pub struct InMemoryTenderLedger {
    tenders: BTreeMap<TenderId, Tender>,
}

impl InMemoryTenderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tenders.is_empty()
    }

    fn tender_mut(&mut self, id: TenderId) -> LedgerResult<&mut Tender> {
        self.tenders
            .get_mut(&id)
            .ok_or(LedgerError::TenderNotFound(id))
    }
}

impl TenderLedger for InMemoryTenderLedger {
    fn tender_count(&self) -> u64 {
        self.tenders.len() as u64
    }

    fn create_tender(
        &mut self,
        draft: NewTender,
        created_by: Identity,
        created_at_ms: i64,
    ) -> LedgerResult<TenderId> {
        let id = TenderId::after_count(self.tender_count());
        self.tenders
            .insert(id, Tender::publish(id, draft, created_by, created_at_ms));
        Ok(id)
    }

    fn append_proposal(&mut self, id: TenderId, proposal: Proposal) -> LedgerResult<usize> {
        let tender = self.tender_mut(id)?;
        tender.proposals.push(proposal);
        Ok(tender.proposals.len())
    }

    fn get_tender(&self, id: TenderId) -> LedgerResult<Tender> {
        self.tenders
            .get(&id)
            .cloned()
            .ok_or(LedgerError::TenderNotFound(id))
    }

    fn get_proposals(&self, id: TenderId) -> LedgerResult<Vec<Proposal>> {
        self.tenders
            .get(&id)
            .map(|tender| tender.proposals.clone())
            .ok_or(LedgerError::TenderNotFound(id))
    }

    fn list_tenders(&self, query: &TenderListQuery) -> Vec<Tender> {
        let limit = query.limit.map_or(usize::MAX, |value| value as usize);
        self.tenders
            .values()
            .skip(query.offset as usize)
            .take(limit)
            .cloned()
            .collect()
    }
}
