//! # dimcheck-core — Foundational Types for dimcheck
//!
//! This crate is the leaf of the dimcheck workspace. It defines the
//! vocabulary that shape schemas are written in and the minimal interface
//! an array library must expose to be validated. Every other crate in the
//! workspace depends on `dimcheck-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed element-type vocabulary.** `ElementType` enumerates every
//!    element type a schema can name, and `DtypeKind` groups them into
//!    classes (`float`, `signed`, ...). Exhaustive `match` everywhere.
//!
//! 2. **Capabilities are explicit.** Some array libraries have named axes or
//!    sparse layouts, most do not. `ArrayCapabilities` describes a library at
//!    schema-construction time, and `ArrayLike` reports "no such concept" as
//!    `None`, which is distinct from "present but unset".
//!
//! 3. **Metadata only.** Validation never touches element data. `ArrayMeta`
//!    is a complete `ArrayLike` built from shape and dtype alone.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dimcheck-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod array;
pub mod dtype;
pub mod error;
pub mod layout;
pub mod meta;

// Re-export primary types for ergonomic imports.
pub use array::{render_array, ArrayCapabilities, ArrayLike};
pub use dtype::{DtypeKind, ElementType};
pub use error::CoreError;
pub use layout::Layout;
pub use meta::ArrayMeta;
