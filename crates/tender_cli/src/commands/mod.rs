//! Subcommand implementations.

pub mod hash;
pub mod run;
