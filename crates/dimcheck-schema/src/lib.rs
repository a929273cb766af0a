//! # dimcheck-schema — Array Shape Schemas
//!
//! Declares what an array argument must look like (rank, per-axis sizes,
//! shared dimension names, element type, memory layout, axis names, plus
//! any user-defined predicate) and checks concrete arrays against those
//! declarations.
//!
//! ## Construction (`builder`)
//!
//! A schema is built once from an ordered list of [`Token`]s:
//!
//! - Integers become fixed sizes; `-1` is the wildcard.
//! - Strings become dimension names; names can carry a size.
//! - The ellipsis stands for zero or more leading dimensions and may appear
//!   at most once, at the front.
//! - Element types, layouts, `is_float`, `is_named` and user Details become
//!   whole-array predicates.
//!
//! Malformed declarations are rejected here, never at match time.
//!
//! ## Matching (`matcher`)
//!
//! [`match_array`] checks one array against one schema inside a call-scoped
//! [`BindingEnvironment`]. The first occurrence of a name binds it; every
//! later occurrence in the same call must agree. A failed match leaves the
//! environment exactly as it was.
//!
//! ## Signatures and manifests
//!
//! [`Signature`] groups the schemas of one function and drives a full call
//! through [`CallCheck`]. [`Manifest`] loads signatures from YAML or JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `dimcheck-core` internally.
//! - Schemas are immutable after construction and `Send + Sync`.
//! - Binding environments are per call and never shared.
//! - Mismatches carry the rendered schema, the rendered array and a
//!   structured reason.

pub mod builder;
pub mod detail;
pub mod dimension;
pub mod env;
pub mod error;
pub mod manifest;
pub mod matcher;
pub mod schema;
pub mod signature;

pub use builder::{build_schema, SchemaBuilder, Token};
pub use detail::{Detail, DtypeConstraint, DtypeDetail, FloatDetail, LayoutDetail, NamedDetail};
pub use dimension::{Dim, DimName, ANONYMOUS_NAME};
pub use env::{BindingConflict, BindingEnvironment};
pub use error::{Mismatch, MismatchReason, RankRule, SchemaError};
pub use manifest::{DetailRegistry, FunctionDecl, Manifest, ManifestError, ParamDecl, SignatureSet, TokenSpec};
pub use matcher::match_array;
pub use schema::{ShapeSchema, TensorSchema};
pub use signature::{CallCheck, CallError, Param, Signature};
