//! # Binding Environment
//!
//! Call-scoped table from dimension name to the size first observed for it.
//! One environment is allocated per validated call, threaded through every
//! `match_array` for that call's arguments and return value, and dropped
//! when the call ends. It is never shared between calls and is
//! not `Clone`.
//!
//! Entries are added once and never overwritten or removed.
//!
//! ## Staging
//!
//! The matcher does not write into the environment while it is still
//! checking a value. It records new bindings in a [`StagedBindings`] and
//! commits them only if the whole value matches, so a failed match leaves
//! the environment untouched.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// A name was already bound to a different size.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{name}' is bound to {bound}, cannot rebind to {actual}")]
pub struct BindingConflict {
    /// The dimension name.
    pub name: String,
    /// The size already bound.
    pub bound: usize,
    /// The conflicting size.
    pub actual: usize,
}

/// Dimension-name bindings for one call.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct BindingEnvironment {
    bindings: BTreeMap<String, usize>,
}

impl BindingEnvironment {
    /// A fresh, empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `size`, or check it against an existing binding.
    ///
    /// # Errors
    ///
    /// Returns `BindingConflict` if `name` is bound to a different size.
    pub fn bind(&mut self, name: &str, size: usize) -> Result<(), BindingConflict> {
        match self.bindings.get(name) {
            Some(&bound) if bound != size => Err(BindingConflict {
                name: name.to_string(),
                bound,
                actual: size,
            }),
            Some(_) => Ok(()),
            None => {
                tracing::debug!(name, size, "bound dimension name");
                self.bindings.insert(name.to_string(), size);
                Ok(())
            }
        }
    }

    /// The size bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.bindings.get(name).copied()
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.bindings.iter().map(|(name, size)| (name.as_str(), *size))
    }

    /// Start staging bindings against this environment.
    pub(crate) fn stage(&self) -> StagedBindings<'_> {
        StagedBindings {
            env: self,
            staged: Vec::new(),
        }
    }

    /// Commit bindings produced by a successful match. Names already bound
    /// keep their first size.
    pub(crate) fn commit(&mut self, staged: Vec<(String, usize)>) {
        for (name, size) in staged {
            if let Entry::Vacant(slot) = self.bindings.entry(name) {
                tracing::debug!(name = %slot.key(), size, "bound dimension name");
                slot.insert(size);
            }
        }
    }
}

/// Bindings discovered while matching one value, not yet committed.
#[derive(Debug)]
pub(crate) struct StagedBindings<'a> {
    env: &'a BindingEnvironment,
    staged: Vec<(String, usize)>,
}

impl StagedBindings<'_> {
    /// Bind or check `name` against the environment and earlier staged bindings.
    pub(crate) fn bind(&mut self, name: &str, size: usize) -> Result<(), BindingConflict> {
        let bound = self.env.get(name).or_else(|| {
            self.staged
                .iter()
                .find(|(staged, _)| staged == name)
                .map(|(_, size)| *size)
        });
        match bound {
            Some(bound) if bound != size => Err(BindingConflict {
                name: name.to_string(),
                bound,
                actual: size,
            }),
            Some(_) => Ok(()),
            None => {
                self.staged.push((name.to_string(), size));
                Ok(())
            }
        }
    }

    pub(crate) fn into_inner(self) -> Vec<(String, usize)> {
        self.staged
    }
}
