//! # Element Types
//!
//! Defines [`ElementType`], the element data type of an array, and
//! [`DtypeKind`], the class an element type belongs to. Schemas may constrain
//! either an exact element type (`f32`) or a whole class (`float`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Element data type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Boolean.
    Bool,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// IEEE half-precision float.
    F16,
    /// Brain float, 16-bit.
    BF16,
    /// IEEE single-precision float.
    F32,
    /// IEEE double-precision float.
    F64,
    /// Complex number with two `f32` components.
    C64,
    /// Complex number with two `f64` components.
    C128,
}

impl ElementType {
    /// Returns every element type, in declaration order.
    pub fn all() -> &'static [ElementType] {
        &[
            Self::Bool,
            Self::U8,
            Self::U16,
            Self::U32,
            Self::U64,
            Self::I8,
            Self::I16,
            Self::I32,
            Self::I64,
            Self::F16,
            Self::BF16,
            Self::F32,
            Self::F64,
            Self::C64,
            Self::C128,
        ]
    }

    /// The class this element type belongs to.
    pub fn kind(self) -> DtypeKind {
        match self {
            Self::Bool => DtypeKind::Bool,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => DtypeKind::Unsigned,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 => DtypeKind::Signed,
            Self::F16 | Self::BF16 | Self::F32 | Self::F64 => DtypeKind::Float,
            Self::C64 | Self::C128 => DtypeKind::Complex,
        }
    }

    /// Whether this is a floating-point type.
    pub fn is_float(self) -> bool {
        self.kind() == DtypeKind::Float
    }

    /// The canonical lowercase literal for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::C64 => "c64",
            Self::C128 => "c128",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownElementType(s.to_string()))
    }
}

/// Class of element types.
///
/// Mirrors the one-letter kind codes used by array libraries
/// (`b`, `u`, `i`, `f`, `c`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtypeKind {
    /// Booleans.
    Bool,
    /// Unsigned integers.
    Unsigned,
    /// Signed integers.
    Signed,
    /// Floating point.
    Float,
    /// Complex floating point.
    Complex,
}

impl DtypeKind {
    /// The canonical lowercase name for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Unsigned => "unsigned",
            Self::Signed => "signed",
            Self::Float => "float",
            Self::Complex => "complex",
        }
    }

    /// Whether `dtype` belongs to this class.
    pub fn contains(self, dtype: ElementType) -> bool {
        dtype.kind() == self
    }
}

impl fmt::Display for DtypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DtypeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(Self::Bool),
            "unsigned" | "uint" => Ok(Self::Unsigned),
            "signed" | "int" => Ok(Self::Signed),
            "float" => Ok(Self::Float),
            "complex" => Ok(Self::Complex),
            other => Err(CoreError::UnknownDtypeKind(other.to_string())),
        }
    }
}
