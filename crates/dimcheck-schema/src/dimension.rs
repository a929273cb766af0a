//! # Dimension Descriptors
//!
//! One slot of a shape schema. Each variant states exactly what it
//! constrains, so there are no sentinel sizes or sentinel names to decode:
//!
//! | Descriptor | Accepts | Binds |
//! |------------|---------|-------|
//! | `Fixed(3)` | size 3 | — |
//! | `Named { n, None }` | any size | `n` |
//! | `Named { n, Some(3) }` | size 3 | `n` |
//! | `Named { anonymous, _ }` | any size (or the given one) | — |
//! | `Wildcard` | any size | — |
//! | `Ellipsis` | zero or more leading dimensions | — |

use std::fmt;

/// Text form of the anonymous name. A dimension declared with this name is
/// anonymous, never a label.
pub const ANONYMOUS_NAME: &str = "_";

/// Name carried by a named dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DimName {
    /// A name bound across every use within one call.
    Label(String),
    /// The anonymous name: occupies a slot, never bound, and demands an
    /// unnamed axis when axis names are checked.
    Anonymous,
}

impl fmt::Display for DimName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(name) => f.write_str(name),
            Self::Anonymous => f.write_str(ANONYMOUS_NAME),
        }
    }
}

/// One slot of a shape schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Exactly this size.
    Fixed(usize),
    /// A named dimension, optionally with a declared size.
    Named {
        /// The dimension's name.
        name: DimName,
        /// Size declared alongside the name, if any.
        size: Option<usize>,
    },
    /// Any size, never bound.
    Wildcard,
    /// Zero or more unconstrained leading dimensions.
    Ellipsis,
}

impl Dim {
    /// A named dimension without a declared size.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: DimName::Label(name.into()),
            size: None,
        }
    }

    /// Whether this is the ellipsis.
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, Self::Ellipsis)
    }

    /// The axis name this descriptor expects when axis names are checked.
    ///
    /// `None` means the descriptor does not look at names; `Some(None)`
    /// demands an unnamed axis.
    pub fn expected_axis_name(&self) -> Option<Option<&str>> {
        match self {
            Self::Named {
                name: DimName::Label(name),
                ..
            } => Some(Some(name.as_str())),
            Self::Named {
                name: DimName::Anonymous,
                ..
            } => Some(None),
            Self::Fixed(_) | Self::Wildcard | Self::Ellipsis => None,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => write!(f, "{size}"),
            Self::Named { name, size: None } => write!(f, "{name}"),
            Self::Named {
                name,
                size: Some(size),
            } => write!(f, "{name}: {size}"),
            Self::Wildcard => f.write_str("-1"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}
