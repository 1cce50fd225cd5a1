//! Registry use-case services.
//!
//! # Responsibility
//! - Orchestrate access control and ledger calls into the public API.
//! - Keep CLI and other callers decoupled from storage details.

pub mod registry_service;
