//! # Details — Whole-Array Predicates
//!
//! A [`Detail`] is a predicate over a complete array, checked after the
//! per-dimension shape logic. The matcher treats every Detail the same way:
//! it calls [`Detail::check`] and, on failure, builds a diagnostic from
//! [`Detail::describe`] and [`Detail::describe_mismatch`]. Downstream crates
//! add their own Details by implementing the trait; nothing in the matcher
//! needs to change.
//!
//! ## Built-in Details
//!
//! | Detail | Rendered as | Singleton key |
//! |--------|-------------|---------------|
//! | [`DtypeDetail`] | `f32`, `float` | `dtype` |
//! | [`FloatDetail`] | `is_float` | — |
//! | [`NamedDetail`] | `is_named` | `named` |
//! | [`LayoutDetail`] | `strided` | `layout` |
//!
//! A Detail with a singleton key may appear at most once per schema with a
//! given description; two different Details sharing a key are a
//! construction error.

use std::fmt;

use dimcheck_core::{ArrayCapabilities, ArrayLike, DtypeKind, ElementType, Layout};

use crate::error::SchemaError;

/// Singleton key of [`NamedDetail`]. The builder enables per-axis name
/// checking for any Detail carrying this key.
pub const NAMED_KEY: &str = "named";

/// A pluggable predicate over a whole array.
///
/// Implementations must be immutable: one schema is shared by every call
/// that validates against it, possibly from several threads at once.
pub trait Detail: fmt::Debug + Send + Sync {
    /// Whether `array` satisfies this Detail.
    fn check(&self, array: &dyn ArrayLike) -> bool;

    /// Human-readable form of the constraint, used in schema rendering.
    fn describe(&self) -> String;

    /// Rendering of the property of `array` this Detail looks at.
    fn describe_mismatch(&self, array: &dyn ArrayLike) -> String;

    /// Key shared by Details that may appear only once per schema.
    fn singleton_key(&self) -> Option<&'static str> {
        None
    }
}

/// Expected element type, exact or by class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtypeConstraint {
    /// Exactly this element type.
    Exact(ElementType),
    /// Any element type of this class.
    Kind(DtypeKind),
}

impl DtypeConstraint {
    /// Whether `dtype` satisfies the constraint.
    pub fn accepts(self, dtype: ElementType) -> bool {
        match self {
            Self::Exact(expected) => expected == dtype,
            Self::Kind(kind) => kind.contains(dtype),
        }
    }
}

impl fmt::Display for DtypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(dtype) => write!(f, "{dtype}"),
            Self::Kind(kind) => write!(f, "{kind}"),
        }
    }
}

/// Requires a specific element type or element-type class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtypeDetail {
    expected: DtypeConstraint,
}

impl DtypeDetail {
    /// Require exactly `dtype`.
    pub fn exact(dtype: ElementType) -> Self {
        Self {
            expected: DtypeConstraint::Exact(dtype),
        }
    }

    /// Require any element type of class `kind`.
    pub fn kind(kind: DtypeKind) -> Self {
        Self {
            expected: DtypeConstraint::Kind(kind),
        }
    }

    /// The expected element type constraint.
    pub fn expected(&self) -> DtypeConstraint {
        self.expected
    }
}

impl Detail for DtypeDetail {
    fn check(&self, array: &dyn ArrayLike) -> bool {
        self.expected.accepts(array.element_type())
    }

    fn describe(&self) -> String {
        self.expected.to_string()
    }

    fn describe_mismatch(&self, array: &dyn ArrayLike) -> String {
        array.element_type().to_string()
    }

    fn singleton_key(&self) -> Option<&'static str> {
        Some("dtype")
    }
}

/// Requires a floating-point element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatDetail;

impl Detail for FloatDetail {
    fn check(&self, array: &dyn ArrayLike) -> bool {
        array.element_type().is_float()
    }

    fn describe(&self) -> String {
        "is_float".to_string()
    }

    fn describe_mismatch(&self, array: &dyn ArrayLike) -> String {
        let dtype = array.element_type();
        format!("{dtype} ({})", dtype.kind())
    }
}

/// Marks a schema whose axis names are checked.
///
/// The per-axis comparison happens during shape matching; as a Detail this
/// only requires the array kind to have axis names at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamedDetail;

impl Detail for NamedDetail {
    fn check(&self, array: &dyn ArrayLike) -> bool {
        array.supports_axis_names()
    }

    fn describe(&self) -> String {
        "is_named".to_string()
    }

    fn describe_mismatch(&self, array: &dyn ArrayLike) -> String {
        if !array.supports_axis_names() {
            return "no axis names".to_string();
        }
        let names: Vec<&str> = (0..array.rank())
            .map(|axis| array.axis_name(axis).unwrap_or("_"))
            .collect();
        format!("names=({})", names.join(", "))
    }

    fn singleton_key(&self) -> Option<&'static str> {
        Some(NAMED_KEY)
    }
}

/// Requires a specific memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDetail {
    layout: Layout,
}

impl LayoutDetail {
    /// Build a layout requirement for a library with the given capabilities.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::LayoutUnsupported` if the library has no layouts.
    pub fn new(layout: Layout, capabilities: ArrayCapabilities) -> Result<Self, SchemaError> {
        if !capabilities.layouts {
            return Err(SchemaError::LayoutUnsupported { layout });
        }
        Ok(Self { layout })
    }

    /// The required layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl Detail for LayoutDetail {
    fn check(&self, array: &dyn ArrayLike) -> bool {
        array.memory_layout() == Some(self.layout)
    }

    fn describe(&self) -> String {
        self.layout.to_string()
    }

    fn describe_mismatch(&self, array: &dyn ArrayLike) -> String {
        match array.memory_layout() {
            Some(layout) => layout.to_string(),
            None => "no layout".to_string(),
        }
    }

    fn singleton_key(&self) -> Option<&'static str> {
        Some("layout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimcheck_core::ArrayMeta;

    #[test]
    fn dtype_exact_and_kind() {
        let x = ArrayMeta::new(vec![2], ElementType::F32);
        let y = ArrayMeta::new(vec![2], ElementType::I64);
        assert!(DtypeDetail::exact(ElementType::F32).check(&x));
        assert!(!DtypeDetail::exact(ElementType::F64).check(&x));
        assert!(DtypeDetail::kind(DtypeKind::Float).check(&x));
        assert!(!DtypeDetail::kind(DtypeKind::Float).check(&y));
        assert_eq!(DtypeDetail::kind(DtypeKind::Signed).describe(), "signed");
        assert_eq!(DtypeDetail::exact(ElementType::F32).describe_mismatch(&y), "i64");
    }

    #[test]
    fn float_detail_mismatch_names_the_kind() {
        let y = ArrayMeta::new(vec![2], ElementType::U8);
        assert!(!FloatDetail.check(&y));
        assert_eq!(FloatDetail.describe_mismatch(&y), "u8 (unsigned)");
    }

    #[test]
    fn named_detail_requires_naming_capability() {
        let plain = ArrayMeta::new(vec![2], ElementType::F32);
        let named = ArrayMeta::new(vec![2, 3], ElementType::F32)
            .with_names([Some("a"), None])
            .unwrap();
        assert!(!NamedDetail.check(&plain));
        assert_eq!(NamedDetail.describe_mismatch(&plain), "no axis names");
        assert!(NamedDetail.check(&named));
        assert_eq!(NamedDetail.describe_mismatch(&named), "names=(a, _)");
    }

    #[test]
    fn layout_detail_needs_layout_capability() {
        let err = LayoutDetail::new(Layout::Strided, ArrayCapabilities::PLAIN).unwrap_err();
        assert_eq!(err, SchemaError::LayoutUnsupported { layout: Layout::Strided });

        let detail = LayoutDetail::new(Layout::SparseCoo, ArrayCapabilities::FULL).unwrap();
        let dense = ArrayMeta::new(vec![2], ElementType::F32).with_layout(Layout::Strided);
        let sparse = ArrayMeta::new(vec![2], ElementType::F32).with_layout(Layout::SparseCoo);
        assert!(!detail.check(&dense));
        assert!(detail.check(&sparse));
        assert_eq!(detail.describe_mismatch(&dense), "strided");
    }

    #[test]
    fn singleton_keys() {
        assert_eq!(DtypeDetail::exact(ElementType::F32).singleton_key(), Some("dtype"));
        assert_eq!(FloatDetail.singleton_key(), None);
        assert_eq!(NamedDetail.singleton_key(), Some("named"));
    }
}
