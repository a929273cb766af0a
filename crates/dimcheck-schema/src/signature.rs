//! # Call Signatures
//!
//! A [`Signature`] holds the schemas declared for one function's parameters
//! and return value. Intercepting the call is someone else's job; this
//! module is what an interceptor drives once per call:
//!
//! ```text
//! let mut call = signature.begin_call();   // fresh BindingEnvironment
//! call.check_arg(0, &x)?;
//! call.check_arg(1, &y)?;                  // names bound by x constrain y
//! call.check_return(&out)?;
//! let bindings = call.finish();
//! ```
//!
//! Each [`CallCheck`] owns its environment, so concurrent calls against the
//! same signature can never see each other's bindings.

use dimcheck_core::ArrayLike;
use thiserror::Error;

use crate::env::BindingEnvironment;
use crate::error::Mismatch;
use crate::schema::TensorSchema;

/// Error while validating one call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// Wrong number of arguments.
    #[error("{function}() takes {expected} constrained arguments, got {actual}")]
    Arity {
        /// Function name.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument index past the declared parameters.
    #[error("{function}() has no parameter at position {index}")]
    UnknownParameter {
        /// Function name.
        function: String,
        /// The offending index.
        index: usize,
    },

    /// An argument did not match its parameter's schema.
    #[error("argument '{param}' of {function}(): {source}")]
    Argument {
        /// Function name.
        function: String,
        /// Parameter name.
        param: String,
        /// The mismatch.
        source: Mismatch,
    },

    /// The return value did not match the declared return schema.
    #[error("return value of {function}(): {source}")]
    Return {
        /// Function name.
        function: String,
        /// The mismatch.
        source: Mismatch,
    },
}

/// A constrained parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name, used in diagnostics.
    pub name: String,
    /// Schema the argument must satisfy.
    pub schema: TensorSchema,
}

/// Schemas declared for one function.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
    returns: Option<TensorSchema>,
}

impl Signature {
    /// A signature with no constrained parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    /// Append a constrained parameter.
    pub fn param(mut self, name: impl Into<String>, schema: TensorSchema) -> Self {
        self.params.push(Param {
            name: name.into(),
            schema,
        });
        self
    }

    /// Constrain the return value.
    pub fn returns(mut self, schema: TensorSchema) -> Self {
        self.returns = Some(schema);
        self
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constrained parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The return schema, if any.
    pub fn return_schema(&self) -> Option<&TensorSchema> {
        self.returns.as_ref()
    }

    /// Start validating one call with a fresh environment.
    pub fn begin_call(&self) -> CallCheck<'_> {
        CallCheck {
            signature: self,
            env: BindingEnvironment::new(),
        }
    }

    /// Validate every argument in order, then the return value if given.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Arity` if `args` does not have one entry per
    /// parameter, otherwise the first argument or return mismatch.
    pub fn check_call(
        &self,
        args: &[&dyn ArrayLike],
        ret: Option<&dyn ArrayLike>,
    ) -> Result<BindingEnvironment, CallError> {
        if args.len() != self.params.len() {
            return Err(CallError::Arity {
                function: self.name.clone(),
                expected: self.params.len(),
                actual: args.len(),
            });
        }
        let mut call = self.begin_call();
        for (index, arg) in args.iter().enumerate() {
            call.check_arg(index, *arg)?;
        }
        if let Some(ret) = ret {
            call.check_return(ret)?;
        }
        Ok(call.finish())
    }
}

/// Validation state for one in-progress call.
#[derive(Debug)]
pub struct CallCheck<'a> {
    signature: &'a Signature,
    env: BindingEnvironment,
}

impl CallCheck<'_> {
    /// Validate the argument for parameter `index`.
    ///
    /// # Errors
    ///
    /// Returns `CallError::UnknownParameter` for an out-of-range index and
    /// `CallError::Argument` on a mismatch.
    pub fn check_arg(&mut self, index: usize, array: &dyn ArrayLike) -> Result<(), CallError> {
        let param = self
            .signature
            .params
            .get(index)
            .ok_or_else(|| CallError::UnknownParameter {
                function: self.signature.name.clone(),
                index,
            })?;
        param
            .schema
            .match_array(&mut self.env, array)
            .map_err(|source| CallError::Argument {
                function: self.signature.name.clone(),
                param: param.name.clone(),
                source,
            })
    }

    /// Validate the return value. Unconstrained returns always pass.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Return` on a mismatch.
    pub fn check_return(&mut self, array: &dyn ArrayLike) -> Result<(), CallError> {
        let Some(schema) = &self.signature.returns else {
            return Ok(());
        };
        schema
            .match_array(&mut self.env, array)
            .map_err(|source| CallError::Return {
                function: self.signature.name.clone(),
                source,
            })
    }

    /// Bindings made so far.
    pub fn bindings(&self) -> &BindingEnvironment {
        &self.env
    }

    /// End the call, handing back its bindings.
    pub fn finish(self) -> BindingEnvironment {
        self.env
    }
}
