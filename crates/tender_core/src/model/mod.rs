//! Domain model for tenders and proposals.
//!
//! # Responsibility
//! - Define canonical data structures shared by ledger, registry and CLI.
//!
//! # Invariants
//! - Every tender is identified by a sequential `TenderId`.
//! - Proposals exist only inside their parent tender.

pub mod tender;
