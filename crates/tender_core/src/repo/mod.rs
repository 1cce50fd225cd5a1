//! Ledger storage abstractions.
//!
//! # Responsibility
//! - Define the storage contract the registry service mutates.
//! - Keep map/arena details out of the service layer.
//!
//! # Invariants
//! - Ledger APIs return semantic errors (`TenderNotFound`) and never panic
//!   on unknown ids.

pub mod ledger_repo;
