//! # Error Types — Construction vs Match
//!
//! Two disjoint error classes:
//!
//! - [`SchemaError`] is raised only while building a schema. It is
//!   deterministic: the same token list always fails the same way, before
//!   any value is validated.
//! - [`Mismatch`] is raised only while validating a value. It means "this
//!   value does not satisfy this schema" and is always recoverable by the
//!   caller. It carries the rendered schema, the rendered array, and a
//!   structured [`MismatchReason`].

use std::fmt;

use dimcheck_core::Layout;
use thiserror::Error;

/// Error while building a schema from tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// More than one ellipsis in one shape.
    #[error("a shape may contain at most one ellipsis (...)")]
    DuplicateEllipsis,

    /// The ellipsis was not the first dimension.
    #[error("the ellipsis (...) must be the leading dimension, found at position {position}")]
    EllipsisNotLeading {
        /// Index of the ellipsis among the dimension tokens.
        position: usize,
    },

    /// Two different Details share a singleton key.
    #[error("conflicting {key} constraints: {existing} and {requested}")]
    ConflictingDetail {
        /// The singleton key, e.g. `dtype` or `layout`.
        key: String,
        /// Description of the Detail already in the schema.
        existing: String,
        /// Description of the Detail that conflicts with it.
        requested: String,
    },

    /// Axis-name checking was requested for a library without axis names.
    #[error("the target array library has no axis names, so they cannot be checked")]
    NamesUnsupported,

    /// A layout was requested for a library without layouts.
    #[error("the target array library has no memory layouts, cannot require {layout}")]
    LayoutUnsupported {
        /// The requested layout.
        layout: Layout,
    },

    /// A size token that is neither non-negative nor the wildcard `-1`.
    #[error("invalid dimension size {0}: expected a size >= 0 or -1 for any size")]
    InvalidSize(i64),

    /// A dimension name that is empty.
    #[error("dimension names must not be empty")]
    EmptyName,

    /// The open marker was combined with explicit dimensions.
    #[error("an open (any rank) schema cannot also list dimensions")]
    OpenWithDimensions,

    /// The scalar marker was combined with dimensions or the open marker.
    #[error("a scalar schema cannot also list dimensions or be open")]
    ScalarWithDimensions,
}

/// Expected rank of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankRule {
    /// Rank must equal this value.
    Exactly(usize),
    /// Rank must be at least this value (the ellipsis absorbs the rest).
    AtLeast(usize),
}

impl fmt::Display for RankRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Why a value did not match a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    /// Wrong number of dimensions.
    #[error("rank {actual}, expected {expected}")]
    Rank {
        /// What the schema demands.
        expected: RankRule,
        /// The array's rank.
        actual: usize,
    },

    /// A fixed-size dimension has a different size.
    #[error("dimension {axis} has size {actual}, expected {expected}")]
    FixedSize {
        /// Axis index in the array.
        axis: usize,
        /// Size the schema demands.
        expected: usize,
        /// Size the array has.
        actual: usize,
    },

    /// A named dimension disagrees with the size already bound to its name.
    #[error("dimension {axis} '{name}' has size {actual}, but '{name}' is {bound}")]
    NameConflict {
        /// The dimension name.
        name: String,
        /// Axis index in the array.
        axis: usize,
        /// The size previously bound (or declared) for the name.
        bound: usize,
        /// The conflicting size.
        actual: usize,
    },

    /// An axis carries a different name than the schema expects.
    #[error("axis {axis} is named {}, expected {}", show_name(.actual), show_name(.expected))]
    AxisName {
        /// Axis index in the array.
        axis: usize,
        /// Expected name; `None` demands an unnamed axis.
        expected: Option<String>,
        /// The axis' actual name.
        actual: Option<String>,
    },

    /// The schema checks axis names but the array kind has none.
    #[error("the schema checks axis names, but this kind of array has none")]
    NamesUnsupported,

    /// A Detail rejected the array.
    #[error("expected {expected}, found {actual}")]
    Detail {
        /// Description of the failed Detail.
        expected: String,
        /// The Detail's rendering of the array.
        actual: String,
    },
}

fn show_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("'{name}'"),
        None => "nothing".to_string(),
    }
}

/// A value that did not match a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{array} does not match {schema}: {reason}")]
pub struct Mismatch {
    /// Rendered schema.
    pub schema: String,
    /// Rendered array (shape, dtype, layout).
    pub array: String,
    /// The first failing check.
    pub reason: MismatchReason,
}
