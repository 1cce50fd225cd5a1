//! Core domain logic for the tender registry.
//! This crate owns every registry invariant: owner gating, sequential tender
//! ids and append-only proposal lists.

pub mod access;
pub mod clock;
pub mod config;
pub mod content;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use access::owner::{AccessError, OwnerGuard};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, LogConfig, RegistryConfig};
pub use content::content_hash;
pub use events::{EventLog, LoggingObserver, RegistryEvent, RegistryObserver};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::tender::{Identity, NewTender, Proposal, Tender, TenderId};
pub use repo::ledger_repo::{
    InMemoryTenderLedger, LedgerError, LedgerResult, TenderLedger, TenderListQuery,
};
pub use service::registry_service::{RegistryError, RegistryResult, TenderRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
