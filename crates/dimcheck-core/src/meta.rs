//! # Array Metadata
//!
//! [`ArrayMeta`] is an element-free array description: shape, element type,
//! and optionally axis names and memory layout. It is the reference
//! [`ArrayLike`] implementation used by the CLI and by tests.
//!
//! ## Text Form
//!
//! ```text
//! 2x3:f32                 rank-2 f32 array
//! scalar:i64              rank-0 i64 array (also "()")
//! 4x5:f32@strided         with a memory layout
//! 4x5:f32#batch,_         with axis names ("_" leaves an axis unnamed)
//! 4x5:f32#a,b@strided     suffixes may come in either order
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::array::ArrayLike;
use crate::dtype::ElementType;
use crate::error::CoreError;
use crate::layout::Layout;

/// Name used in the text form for an axis without a name.
const UNNAMED_AXIS: &str = "_";

/// Shape and type metadata for one array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayMeta {
    /// Dimension sizes.
    pub shape: Vec<usize>,
    /// Element type.
    pub dtype: ElementType,
    /// Per-axis names. `None` means the array kind has no axis names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<Option<String>>>,
    /// Memory layout. `None` means the array kind has no layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl ArrayMeta {
    /// A plain array of the given shape and element type.
    pub fn new(shape: impl Into<Vec<usize>>, dtype: ElementType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
            names: None,
            layout: None,
        }
    }

    /// A rank-0 array.
    pub fn scalar(dtype: ElementType) -> Self {
        Self::new(Vec::new(), dtype)
    }

    /// Attach per-axis names, one per dimension.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AxisNameCount` if the number of names differs from the rank.
    pub fn with_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = Option<S>>,
    ) -> Result<Self, CoreError> {
        let names: Vec<Option<String>> = names.into_iter().map(|n| n.map(Into::into)).collect();
        if names.len() != self.shape.len() {
            return Err(CoreError::AxisNameCount {
                names: names.len(),
                rank: self.shape.len(),
            });
        }
        self.names = Some(names);
        Ok(self)
    }

    /// Mark the array kind as supporting axis names, with every axis unnamed.
    pub fn with_unnamed_axes(mut self) -> Self {
        self.names = Some(vec![None; self.shape.len()]);
        self
    }

    /// Attach a memory layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }
}

impl ArrayLike for ArrayMeta {
    fn rank(&self) -> usize {
        self.shape.len()
    }

    fn size_of(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    fn element_type(&self) -> ElementType {
        self.dtype
    }

    fn supports_axis_names(&self) -> bool {
        self.names.is_some()
    }

    fn axis_name(&self, axis: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(axis))
            .and_then(|name| name.as_deref())
    }

    fn memory_layout(&self) -> Option<Layout> {
        self.layout
    }
}

impl FromStr for ArrayMeta {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidArrayDescription {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let is_marker = |c: char| c == '@' || c == '#';
        let (rest, mut suffixes) = match input.find(is_marker) {
            Some(at) => input.split_at(at),
            None => (input, ""),
        };
        let mut layout = None;
        let mut names = None;
        while let Some(marker) = suffixes.chars().next() {
            let body = &suffixes[1..];
            let end = body.find(is_marker).unwrap_or(body.len());
            let (value, next) = body.split_at(end);
            let slot = if marker == '@' { &mut layout } else { &mut names };
            if slot.replace(value).is_some() {
                return Err(invalid(&format!("'{marker}' given more than once")));
            }
            suffixes = next;
        }
        let layout = layout.map(str::parse::<Layout>).transpose()?;
        let (shape_text, dtype_text) = rest
            .split_once(':')
            .ok_or_else(|| invalid("expected '<shape>:<dtype>'"))?;
        let dtype: ElementType = dtype_text.trim().parse()?;

        let shape_text = shape_text.trim();
        let shape = if shape_text == "scalar" || shape_text == "()" {
            Vec::new()
        } else {
            shape_text
                .split('x')
                .map(|dim| dim.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| invalid(&format!("bad dimension size: {e}")))?
        };

        let mut meta = ArrayMeta::new(shape, dtype);
        if let Some(layout) = layout {
            meta = meta.with_layout(layout);
        }
        if let Some(names) = names {
            let names: Vec<Option<&str>> = if names.is_empty() {
                Vec::new()
            } else {
                names
                    .split(',')
                    .map(str::trim)
                    .map(|n| (n != UNNAMED_AXIS).then_some(n))
                    .collect()
            };
            meta = meta.with_names(names)?;
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_description() {
        let meta: ArrayMeta = "2x3:f32".parse().unwrap();
        assert_eq!(meta.shape, vec![2, 3]);
        assert_eq!(meta.dtype, ElementType::F32);
        assert!(!meta.supports_axis_names());
        assert_eq!(meta.memory_layout(), None);
    }

    #[test]
    fn parse_scalar_descriptions() {
        let a: ArrayMeta = "scalar:i64".parse().unwrap();
        let b: ArrayMeta = "():i64".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rank(), 0);
    }

    #[test]
    fn parse_layout_and_names() {
        let meta: ArrayMeta = "4x5:f32@strided#batch,_".parse().unwrap();
        assert_eq!(meta.memory_layout(), Some(Layout::Strided));
        assert!(meta.supports_axis_names());
        assert_eq!(meta.axis_name(0), Some("batch"));
        assert_eq!(meta.axis_name(1), None);
    }

    #[test]
    fn suffixes_parse_in_either_order() {
        let names_first: ArrayMeta = "4x5:f32#a,b@strided".parse().unwrap();
        let layout_first: ArrayMeta = "4x5:f32@strided#a,b".parse().unwrap();
        assert_eq!(names_first, layout_first);
        assert_eq!(names_first.memory_layout(), Some(Layout::Strided));
        assert_eq!(names_first.axis_name(1), Some("b"));

        assert!(matches!(
            "4x5:f32@strided#a,b@sparse_coo".parse::<ArrayMeta>(),
            Err(CoreError::InvalidArrayDescription { reason, .. }) if reason.contains("'@'")
        ));
    }

    #[test]
    fn parse_rejects_missing_dtype() {
        assert!(matches!(
            "2x3".parse::<ArrayMeta>(),
            Err(CoreError::InvalidArrayDescription { .. })
        ));
    }

    #[test]
    fn parse_rejects_bad_dimension() {
        assert!(matches!(
            "2xq:f32".parse::<ArrayMeta>(),
            Err(CoreError::InvalidArrayDescription { .. })
        ));
    }

    #[test]
    fn name_count_must_match_rank() {
        let err = ArrayMeta::new(vec![2, 3], ElementType::F32)
            .with_names([Some("a")])
            .unwrap_err();
        assert_eq!(err, CoreError::AxisNameCount { names: 1, rank: 2 });
    }

    #[test]
    fn unnamed_axes_are_supported_but_unset() {
        let meta = ArrayMeta::new(vec![2], ElementType::F32).with_unnamed_axes();
        assert!(meta.supports_axis_names());
        assert_eq!(meta.axis_name(0), None);
    }
}
