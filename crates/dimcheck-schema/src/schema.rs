//! # Shape and Tensor Schemas
//!
//! A [`ShapeSchema`] is an ordered list of [`Dim`] descriptors plus two
//! flags: whether axis names are checked, and whether the rank is left
//! unconstrained altogether ("open"). An open schema is different from an
//! empty one: the empty schema demands rank exactly 0.
//!
//! A [`TensorSchema`] pairs a shape schema with the Details checked against
//! the whole array. Schemas are immutable once built and cheap to clone;
//! Details are shared behind `Arc`.

use std::fmt;
use std::sync::Arc;

use dimcheck_core::ArrayLike;

use crate::detail::Detail;
use crate::dimension::Dim;
use crate::env::BindingEnvironment;
use crate::error::Mismatch;
use crate::matcher;

/// Per-dimension part of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeSchema {
    dims: Vec<Dim>,
    check_names: bool,
    open: bool,
}

impl ShapeSchema {
    pub(crate) fn new(dims: Vec<Dim>, check_names: bool, open: bool) -> Self {
        Self {
            dims,
            check_names,
            open,
        }
    }

    /// A schema matching only rank-0 arrays.
    pub fn scalar() -> Self {
        Self::new(Vec::new(), false, false)
    }

    /// A schema matching arrays of any rank.
    pub fn open() -> Self {
        Self::new(Vec::new(), false, true)
    }

    /// The dimension descriptors, leading first.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Whether axis names are compared.
    pub fn check_names(&self) -> bool {
        self.check_names
    }

    /// Whether the rank is unconstrained.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the shape contains an ellipsis.
    pub fn has_ellipsis(&self) -> bool {
        self.dims.iter().any(Dim::is_ellipsis)
    }

    /// Number of descriptors other than the ellipsis.
    pub fn explicit_len(&self) -> usize {
        self.dims.iter().filter(|d| !d.is_ellipsis()).count()
    }
}

impl fmt::Display for ShapeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open {
            return f.write_str("any");
        }
        f.write_str("(")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}")?;
        }
        f.write_str(")")
    }
}

/// A complete array constraint: shape plus Details.
#[derive(Debug, Clone)]
pub struct TensorSchema {
    shape: ShapeSchema,
    details: Vec<Arc<dyn Detail>>,
}

impl TensorSchema {
    pub(crate) fn new(shape: ShapeSchema, details: Vec<Arc<dyn Detail>>) -> Self {
        Self { shape, details }
    }

    /// The shape part of the schema.
    pub fn shape(&self) -> &ShapeSchema {
        &self.shape
    }

    /// The Details, in declaration order.
    pub fn details(&self) -> &[Arc<dyn Detail>] {
        &self.details
    }

    /// Match `array` against this schema, binding names into `env`.
    ///
    /// See [`match_array`](crate::match_array).
    pub fn match_array(
        &self,
        env: &mut BindingEnvironment,
        array: &dyn ArrayLike,
    ) -> Result<(), Mismatch> {
        matcher::match_array(self, env, array)
    }
}

impl fmt::Display for TensorSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape)?;
        for detail in &self.details {
            write!(f, ", {}", detail.describe())?;
        }
        Ok(())
    }
}
