//! # Matcher
//!
//! Decides whether one array satisfies one [`TensorSchema`], binding
//! dimension names into the call's [`BindingEnvironment`].
//!
//! ## Algorithm
//!
//! 1. **Rank.** Without an ellipsis the rank must equal the number of
//!    descriptors; with one, the explicit descriptors must not outnumber
//!    the array's dimensions. Open schemas skip steps 1–3.
//! 2. **Alignment.** Descriptors are paired with array dimensions from the
//!    trailing edge backward, so the leading ellipsis absorbs any surplus
//!    leading (batch) dimensions. Scanning stops at the ellipsis.
//! 3. **Per dimension**, right to left: fixed sizes compare, wildcards pass,
//!    names bind or compare, and with axis-name checking on, axis names
//!    compare.
//! 4. **Details.** Every Detail is checked against the whole array.
//!
//! The first failure is returned. Bindings found along the way are staged
//! and committed to the environment only when all four steps pass.

use dimcheck_core::{render_array, ArrayLike};

use crate::dimension::{Dim, DimName};
use crate::env::BindingEnvironment;
use crate::error::{Mismatch, MismatchReason, RankRule};
use crate::schema::TensorSchema;

/// Match `array` against `schema` within the call that owns `env`.
///
/// # Errors
///
/// Returns a [`Mismatch`] naming the schema, the array, and the first
/// failing check. On error `env` is unchanged.
pub fn match_array(
    schema: &TensorSchema,
    env: &mut BindingEnvironment,
    array: &dyn ArrayLike,
) -> Result<(), Mismatch> {
    let mut staged = env.stage();
    let outcome = check(schema, array, |name, size| staged.bind(name, size));
    let staged = staged.into_inner();

    match outcome {
        Ok(()) => {
            env.commit(staged);
            Ok(())
        }
        Err(reason) => {
            let mismatch = Mismatch {
                schema: schema.to_string(),
                array: render_array(array),
                reason,
            };
            tracing::debug!(
                schema = %mismatch.schema,
                array = %mismatch.array,
                reason = %mismatch.reason,
                "array does not match schema"
            );
            Err(mismatch)
        }
    }
}

fn check<F>(schema: &TensorSchema, array: &dyn ArrayLike, mut bind: F) -> Result<(), MismatchReason>
where
    F: FnMut(&str, usize) -> Result<(), crate::env::BindingConflict>,
{
    let shape = schema.shape();

    if !shape.is_open() {
        let rank = array.rank();
        let explicit = shape.explicit_len();
        if shape.has_ellipsis() {
            if explicit > rank {
                return Err(MismatchReason::Rank {
                    expected: RankRule::AtLeast(explicit),
                    actual: rank,
                });
            }
        } else if explicit != rank {
            return Err(MismatchReason::Rank {
                expected: RankRule::Exactly(explicit),
                actual: rank,
            });
        }

        if shape.check_names() && !array.supports_axis_names() {
            return Err(MismatchReason::NamesUnsupported);
        }

        for (dim, axis) in shape.dims().iter().rev().zip((0..rank).rev()) {
            let actual = array.size_of(axis);
            tracing::trace!(axis, actual, dim = %dim, "matching dimension");
            match dim {
                Dim::Ellipsis => break,
                Dim::Fixed(expected) => {
                    if actual != *expected {
                        return Err(MismatchReason::FixedSize {
                            axis,
                            expected: *expected,
                            actual,
                        });
                    }
                }
                Dim::Wildcard => {}
                Dim::Named { name, size } => {
                    if let Some(declared) = size {
                        if actual != *declared {
                            return Err(MismatchReason::NameConflict {
                                name: name.to_string(),
                                axis,
                                bound: *declared,
                                actual,
                            });
                        }
                    }
                    if let DimName::Label(label) = name {
                        bind(label.as_str(), actual).map_err(|conflict| MismatchReason::NameConflict {
                            name: conflict.name,
                            axis,
                            bound: conflict.bound,
                            actual: conflict.actual,
                        })?;
                    }
                }
            }

            if shape.check_names() {
                if let Some(expected) = dim.expected_axis_name() {
                    let found = array.axis_name(axis);
                    if found != expected {
                        return Err(MismatchReason::AxisName {
                            axis,
                            expected: expected.map(str::to_string),
                            actual: found.map(str::to_string),
                        });
                    }
                }
            }
        }
    }

    for detail in schema.details() {
        if !detail.check(array) {
            return Err(MismatchReason::Detail {
                expected: detail.describe(),
                actual: detail.describe_mismatch(array),
            });
        }
    }

    Ok(())
}
