//! Tender and proposal domain model.
//!
//! # Responsibility
//! - Define the canonical tender/proposal records held by the ledger.
//! - Provide the identity and identifier newtypes used in every signature.
//!
//! # Invariants
//! - `TenderId` values handed out by the ledger start at 1 and are dense.
//! - `Tender::proposals` is append-only; records are never removed.
//! - `code`, `description` and hash fields are opaque and stored verbatim.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Sequential tender identifier.
///
/// Serialized as a bare integer to match external wire shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenderId(u64);

impl TenderId {
    /// First identifier allocated by an empty ledger.
    pub const FIRST: TenderId = TenderId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Identifier allocated after `count` tenders already exist.
    pub(crate) fn after_count(count: u64) -> Self {
        Self(count + 1)
    }
}

impl Display for TenderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TenderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Caller identity (address/principal) as authenticated by the transport.
///
/// The registry never interprets the value; equality is exact string
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Caller-supplied fields for publishing a tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTender {
    /// CUCE procurement code. Not required to be unique.
    pub code: String,
    pub description: String,
    /// Reference to the external tender document (usually a hash).
    pub document_hash: String,
}

impl NewTender {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        document_hash: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            document_hash: document_hash.into(),
        }
    }
}

/// Published procurement opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    pub id: TenderId,
    pub code: String,
    pub description: String,
    pub document_hash: String,
    /// Identity that published the tender (the owner at that time).
    pub created_by: Identity,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
    /// Submissions in arrival order.
    pub proposals: Vec<Proposal>,
}

impl Tender {
    /// Builds a freshly published tender with no proposals.
    pub fn publish(
        id: TenderId,
        draft: NewTender,
        created_by: Identity,
        created_at_ms: i64,
    ) -> Self {
        Self {
            id,
            code: draft.code,
            description: draft.description,
            document_hash: draft.document_hash,
            created_by,
            created_at_ms,
            proposals: Vec::new(),
        }
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }
}

/// Participant submission against one tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: Identity,
    /// Opaque content reference for the proposal document.
    pub proposal_hash: String,
    /// Unix epoch milliseconds.
    pub submitted_at_ms: i64,
}

impl Proposal {
    pub fn new(proposer: Identity, proposal_hash: impl Into<String>, submitted_at_ms: i64) -> Self {
        Self {
            proposer,
            proposal_hash: proposal_hash.into(),
            submitted_at_ms,
        }
    }
}
