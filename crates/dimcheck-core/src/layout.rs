//! # Memory Layout
//!
//! Storage layouts an array library may expose. Libraries without a layout
//! concept report `None` from [`ArrayLike::memory_layout`](crate::ArrayLike::memory_layout).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Memory layout of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Dense storage addressed by strides.
    Strided,
    /// Sparse coordinate-list storage.
    SparseCoo,
    /// Sparse compressed-row storage.
    SparseCsr,
}

impl Layout {
    /// The canonical snake_case name of this layout.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strided => "strided",
            Self::SparseCoo => "sparse_coo",
            Self::SparseCsr => "sparse_csr",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strided" => Ok(Self::Strided),
            "sparse_coo" => Ok(Self::SparseCoo),
            "sparse_csr" => Ok(Self::SparseCsr),
            other => Err(CoreError::UnknownLayout(other.to_string())),
        }
    }
}
