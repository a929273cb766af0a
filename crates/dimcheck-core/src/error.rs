//! # Error Types
//!
//! Errors raised while interpreting the textual forms of core vocabulary:
//! element-type names, layout names, and array descriptions. Schema
//! construction and matching errors live in `dimcheck-schema`.

use thiserror::Error;

/// Error in the core vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The element type name is not one of the known literals.
    #[error("unknown element type '{0}'")]
    UnknownElementType(String),

    /// The element-type class name is not one of the known classes.
    #[error("unknown element type class '{0}'")]
    UnknownDtypeKind(String),

    /// The layout name is not one of the known layouts.
    #[error("unknown memory layout '{0}'")]
    UnknownLayout(String),

    /// An array description could not be parsed.
    #[error("invalid array description '{input}': {reason}")]
    InvalidArrayDescription {
        /// The description as given.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Axis names were supplied for a different number of axes than the shape has.
    #[error("axis name count {names} does not match rank {rank}")]
    AxisNameCount {
        /// Number of axis names supplied.
        names: usize,
        /// Rank of the shape.
        rank: usize,
    },
}
