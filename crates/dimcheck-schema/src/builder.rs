//! # Schema Builder
//!
//! Turns an ordered list of loosely-typed [`Token`]s into a validated
//! [`TensorSchema`]. Structural mistakes (two ellipses, two different
//! dtypes, a layout for a library without layouts) are rejected here, when
//! the constraint is declared, never later when a value is matched.
//!
//! ## Classification
//!
//! | Token | Becomes |
//! |-------|---------|
//! | `Size(n)`, n ≥ 0 | `Dim::Fixed(n)` |
//! | `Size(-1)`, `Wildcard` | `Dim::Wildcard` |
//! | `Ellipsis` | `Dim::Ellipsis` (once, leading) |
//! | `Name`, `SizedName` | `Dim::Named` (`"_"` is the anonymous name) |
//! | `Anonymous` | `Dim::Named` with the anonymous name |
//! | `Dtype`, `DtypeKind` | [`DtypeDetail`] |
//! | `Layout` | [`LayoutDetail`] |
//! | `IsFloat` | [`FloatDetail`] |
//! | `IsNamed` | axis-name checking plus [`NamedDetail`] |
//! | `Detail` | appended as-is |
//! | `Open` | rank unconstrained |
//! | `Scalar` | rank exactly 0 |
//!
//! With no dimension tokens at all, an empty token list is a scalar schema
//! while a list holding only Details leaves the rank unconstrained.

use std::sync::Arc;

use dimcheck_core::{ArrayCapabilities, DtypeKind, ElementType, Layout};

use crate::detail::{Detail, DtypeDetail, FloatDetail, LayoutDetail, NamedDetail, NAMED_KEY};
use crate::dimension::{Dim, DimName, ANONYMOUS_NAME};
use crate::error::SchemaError;
use crate::schema::{ShapeSchema, TensorSchema};

/// One raw item of a constraint declaration.
#[derive(Debug, Clone)]
pub enum Token {
    /// A size: `n >= 0` is fixed, `-1` is the wildcard.
    Size(i64),
    /// Any size, never bound.
    Wildcard,
    /// Zero or more leading dimensions.
    Ellipsis,
    /// A named dimension of any size.
    Name(String),
    /// A named dimension with a declared size.
    SizedName(String, usize),
    /// The anonymous name, optionally with a declared size.
    Anonymous(Option<usize>),
    /// An exact element type.
    Dtype(ElementType),
    /// An element-type class.
    DtypeKind(DtypeKind),
    /// A memory layout.
    Layout(Layout),
    /// Floating-point element type of any width.
    IsFloat,
    /// Check axis names.
    IsNamed,
    /// A user-supplied Detail.
    Detail(Arc<dyn Detail>),
    /// Any rank.
    Open,
    /// Rank exactly 0.
    Scalar,
}

impl Token {
    /// A named dimension.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// A named dimension with a declared size.
    pub fn sized(name: impl Into<String>, size: usize) -> Self {
        Self::SizedName(name.into(), size)
    }

    /// A user-supplied Detail.
    pub fn detail(detail: impl Detail + 'static) -> Self {
        Self::Detail(Arc::new(detail))
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<ElementType> for Token {
    fn from(dtype: ElementType) -> Self {
        Self::Dtype(dtype)
    }
}

impl From<DtypeKind> for Token {
    fn from(kind: DtypeKind) -> Self {
        Self::DtypeKind(kind)
    }
}

impl From<Layout> for Token {
    fn from(layout: Layout) -> Self {
        Self::Layout(layout)
    }
}

/// Builds schemas for one target array library.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBuilder {
    capabilities: ArrayCapabilities,
}

impl SchemaBuilder {
    /// A builder for a library with the given capabilities.
    pub fn new(capabilities: ArrayCapabilities) -> Self {
        Self { capabilities }
    }

    /// The capabilities schemas are built for.
    pub fn capabilities(&self) -> ArrayCapabilities {
        self.capabilities
    }

    /// Build a schema from tokens.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` describing the first structural problem.
    pub fn build<I>(&self, tokens: I) -> Result<TensorSchema, SchemaError>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut dims: Vec<Dim> = Vec::new();
        let mut details: Vec<Arc<dyn Detail>> = Vec::new();
        let mut check_names = false;
        let mut open = false;
        let mut scalar = false;

        for token in tokens {
            match token {
                Token::Size(size) => dims.push(classify_size(size)?),
                Token::Wildcard => dims.push(Dim::Wildcard),
                Token::Ellipsis => {
                    if dims.iter().any(Dim::is_ellipsis) {
                        return Err(SchemaError::DuplicateEllipsis);
                    }
                    if !dims.is_empty() {
                        return Err(SchemaError::EllipsisNotLeading {
                            position: dims.len(),
                        });
                    }
                    dims.push(Dim::Ellipsis);
                }
                Token::Name(name) => dims.push(named(name, None)?),
                Token::SizedName(name, size) => dims.push(named(name, Some(size))?),
                Token::Anonymous(size) => dims.push(Dim::Named {
                    name: DimName::Anonymous,
                    size,
                }),
                Token::Dtype(dtype) => {
                    push_detail(&mut details, Arc::new(DtypeDetail::exact(dtype)))?
                }
                Token::DtypeKind(kind) => {
                    push_detail(&mut details, Arc::new(DtypeDetail::kind(kind)))?
                }
                Token::Layout(layout) => push_detail(
                    &mut details,
                    Arc::new(LayoutDetail::new(layout, self.capabilities)?),
                )?,
                Token::IsFloat => push_detail(&mut details, Arc::new(FloatDetail))?,
                Token::IsNamed => {
                    check_names |= self.add_detail(&mut details, Arc::new(NamedDetail))?;
                }
                Token::Detail(detail) => {
                    check_names |= self.add_detail(&mut details, detail)?;
                }
                Token::Open => open = true,
                Token::Scalar => scalar = true,
            }
        }

        if scalar && (open || !dims.is_empty()) {
            return Err(SchemaError::ScalarWithDimensions);
        }
        if open && !dims.is_empty() {
            return Err(SchemaError::OpenWithDimensions);
        }
        let open = open || (dims.is_empty() && !scalar && !details.is_empty());

        let schema = TensorSchema::new(ShapeSchema::new(dims, check_names, open), details);
        tracing::debug!(schema = %schema, "built schema");
        Ok(schema)
    }

    /// Add `detail`. Returns whether it asks for per-axis name checking,
    /// which needs a library with axis names.
    fn add_detail(
        &self,
        details: &mut Vec<Arc<dyn Detail>>,
        detail: Arc<dyn Detail>,
    ) -> Result<bool, SchemaError> {
        let named = detail.singleton_key() == Some(NAMED_KEY);
        if named && !self.capabilities.named_axes {
            return Err(SchemaError::NamesUnsupported);
        }
        push_detail(details, detail)?;
        Ok(named)
    }
}

/// Build a schema for a library with the given capabilities.
pub fn build_schema<I>(tokens: I, capabilities: ArrayCapabilities) -> Result<TensorSchema, SchemaError>
where
    I: IntoIterator<Item = Token>,
{
    SchemaBuilder::new(capabilities).build(tokens)
}

fn classify_size(size: i64) -> Result<Dim, SchemaError> {
    match size {
        -1 => Ok(Dim::Wildcard),
        n if n >= 0 => usize::try_from(n)
            .map(Dim::Fixed)
            .map_err(|_| SchemaError::InvalidSize(n)),
        n => Err(SchemaError::InvalidSize(n)),
    }
}

fn named(name: String, size: Option<usize>) -> Result<Dim, SchemaError> {
    if name.is_empty() {
        return Err(SchemaError::EmptyName);
    }
    let name = if name == ANONYMOUS_NAME {
        DimName::Anonymous
    } else {
        DimName::Label(name)
    };
    Ok(Dim::Named { name, size })
}

fn push_detail(
    details: &mut Vec<Arc<dyn Detail>>,
    detail: Arc<dyn Detail>,
) -> Result<(), SchemaError> {
    if let Some(key) = detail.singleton_key() {
        let existing = details
            .iter()
            .find(|d| d.singleton_key() == Some(key));
        if let Some(existing) = existing {
            let (existing, requested) = (existing.describe(), detail.describe());
            if existing == requested {
                return Ok(());
            }
            return Err(SchemaError::ConflictingDetail {
                key: key.to_string(),
                existing,
                requested,
            });
        }
    }
    details.push(detail);
    Ok(())
}
