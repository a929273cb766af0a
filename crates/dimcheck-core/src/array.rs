//! # Array Capability
//!
//! The minimal interface dimcheck requires from an array library, and the
//! capability profile a library declares when schemas are built for it.
//!
//! ## Absent vs Unset
//!
//! A library with no concept of axis names is different from an array whose
//! axes happen to be unnamed. `supports_axis_names() == false` means the
//! former; `axis_name(i) == None` on a supporting array means the latter.
//! Likewise `memory_layout() == None` means the library has no layouts.
//! A schema that demands axis-name checks must fail for the former rather
//! than silently pass.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::dtype::ElementType;
use crate::layout::Layout;

/// Metadata view of an array value.
pub trait ArrayLike {
    /// Number of dimensions. Zero for scalars.
    fn rank(&self) -> usize;

    /// Size of dimension `axis`. Callers only pass `axis < rank()`.
    fn size_of(&self, axis: usize) -> usize;

    /// Element data type.
    fn element_type(&self) -> ElementType;

    /// Whether this array kind has a notion of per-axis names at all.
    fn supports_axis_names(&self) -> bool {
        false
    }

    /// Name of axis `axis`, if the kind supports names and the axis is named.
    fn axis_name(&self, _axis: usize) -> Option<&str> {
        None
    }

    /// Memory layout, or `None` when the array kind has no layout concept.
    fn memory_layout(&self) -> Option<Layout> {
        None
    }

    /// Full shape as a vector.
    fn shape(&self) -> Vec<usize> {
        (0..self.rank()).map(|axis| self.size_of(axis)).collect()
    }

    /// Capability profile of this array's kind.
    fn capabilities(&self) -> ArrayCapabilities {
        ArrayCapabilities {
            named_axes: self.supports_axis_names(),
            layouts: self.memory_layout().is_some(),
        }
    }
}

impl<T: ArrayLike + ?Sized> ArrayLike for &T {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size_of(&self, axis: usize) -> usize {
        (**self).size_of(axis)
    }

    fn element_type(&self) -> ElementType {
        (**self).element_type()
    }

    fn supports_axis_names(&self) -> bool {
        (**self).supports_axis_names()
    }

    fn axis_name(&self, axis: usize) -> Option<&str> {
        (**self).axis_name(axis)
    }

    fn memory_layout(&self) -> Option<Layout> {
        (**self).memory_layout()
    }
}

/// What an array library supports, declared when schemas are built.
///
/// The schema builder rejects axis-name checks and layout constraints for
/// libraries that lack them, so misuse is caught at declaration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ArrayCapabilities {
    /// The library can attach a name to each axis.
    #[serde(default)]
    pub named_axes: bool,
    /// The library distinguishes memory layouts.
    #[serde(default)]
    pub layouts: bool,
}

impl ArrayCapabilities {
    /// Plain dense arrays: no axis names, no layouts.
    pub const PLAIN: Self = Self {
        named_axes: false,
        layouts: false,
    };

    /// Libraries with both named axes and layouts.
    pub const FULL: Self = Self {
        named_axes: true,
        layouts: true,
    };
}

/// Render the properties of an array that schemas constrain.
///
/// ```text
/// shape=(2, 3) dtype=f32
/// shape=(batch: 4, 3) dtype=f32 layout=strided
/// ```
pub fn render_array(array: &dyn ArrayLike) -> String {
    let mut out = String::from("shape=(");
    for axis in 0..array.rank() {
        if axis > 0 {
            out.push_str(", ");
        }
        match array.axis_name(axis) {
            Some(name) => {
                let _ = write!(out, "{name}: {}", array.size_of(axis));
            }
            None => {
                let _ = write!(out, "{}", array.size_of(axis));
            }
        }
    }
    let _ = write!(out, ") dtype={}", array.element_type());
    if let Some(layout) = array.memory_layout() {
        let _ = write!(out, " layout={layout}");
    }
    out
}
