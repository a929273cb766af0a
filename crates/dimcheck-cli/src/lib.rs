//! # dimcheck-cli — Command-Line Front End
//!
//! Loads a declaration manifest, builds every schema it declares, and
//! validates described arrays against a declared function signature.
//!
//! ## Subcommands
//!
//! - `inspect` — build and print every declared signature
//! - `check` — validate one described call against a signature
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `dimcheck-schema`; no matching logic here.
//! - Handlers return an exit code; a call that does not match is exit 1,
//!   not an error.

pub mod check;
pub mod config;
pub mod inspect;
