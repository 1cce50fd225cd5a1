//! Single-owner access gate.

use crate::model::tender::Identity;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tracks the one identity allowed to run owner-gated operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerGuard {
    owner: Identity,
}

impl OwnerGuard {
    pub fn new(owner: Identity) -> Self {
        Self { owner }
    }

    pub fn current_owner(&self) -> &Identity {
        &self.owner
    }

    /// Succeeds only when `caller` is the current owner.
    pub fn require_owner(&self, caller: &Identity) -> Result<(), AccessError> {
        if caller == &self.owner {
            return Ok(());
        }
        Err(AccessError::AccessDenied {
            caller: caller.clone(),
        })
    }

    /// Replaces the owner after checking `caller`. Returns the previous owner.
    ///
    /// # Invariants
    /// - On `AccessDenied` the owner is left untouched.
    pub fn transfer(
        &mut self,
        caller: &Identity,
        new_owner: Identity,
    ) -> Result<Identity, AccessError> {
        self.require_owner(caller)?;
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}

/// Owner-gate rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    AccessDenied { caller: Identity },
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied { caller } => {
                write!(f, "access denied: {caller} is not the registry owner")
            }
        }
    }
}

impl Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::{AccessError, OwnerGuard};
    use crate::model::tender::Identity;

    #[test]
    fn owner_passes_the_gate() {
        let guard = OwnerGuard::new(Identity::new("0xA"));
        guard
            .require_owner(&Identity::new("0xA"))
            .expect("owner should be allowed");
    }

    #[test]
    fn other_identities_are_denied_with_their_identity() {
        let guard = OwnerGuard::new(Identity::new("0xA"));
        let err = guard
            .require_owner(&Identity::new("0xB"))
            .expect_err("non-owner must be denied");
        assert_eq!(
            err,
            AccessError::AccessDenied {
                caller: Identity::new("0xB")
            }
        );
        assert!(err.to_string().contains("0xB"));
    }

    #[test]
    fn transfer_requires_current_owner() {
        let mut guard = OwnerGuard::new(Identity::new("0xA"));
        guard
            .transfer(&Identity::new("0xB"), Identity::new("0xB"))
            .expect_err("non-owner transfer must fail");
        assert_eq!(guard.current_owner(), &Identity::new("0xA"));

        let previous = guard
            .transfer(&Identity::new("0xA"), Identity::new("0xB"))
            .expect("owner transfer");
        assert_eq!(previous, Identity::new("0xA"));
        assert_eq!(guard.current_owner(), &Identity::new("0xB"));

        guard
            .require_owner(&Identity::new("0xA"))
            .expect_err("previous owner loses access");
    }
}
