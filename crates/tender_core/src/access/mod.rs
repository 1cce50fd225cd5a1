//! Access control for owner-gated registry operations.
//!
//! # Invariants
//! - Exactly one owner exists at any time.
//! - The owner changes only through an explicit, owner-checked transfer.

pub mod owner;
