//! # Declaration Manifests
//!
//! A manifest declares function signatures as explicit token lists in YAML
//! or JSON. Every schema is built when the manifest is built, so a bad
//! declaration fails at load time with the function and parameter named.
//!
//! ```yaml
//! capabilities: { named_axes: false, layouts: false }
//! functions:
//!   matmul:
//!     params:
//!       - name: a
//!         schema: [ellipsis, {name: n}, {name: k}]
//!       - name: b
//!         schema: [ellipsis, {name: k}, {name: m}, {dtype: f32}]
//!     returns: [ellipsis, {name: n}, {name: m}]
//! ```
//!
//! User Details are referenced by name (`{detail: unsigned}`) and resolved
//! through a [`DetailRegistry`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use dimcheck_core::{ArrayCapabilities, DtypeKind, ElementType, Layout};
use serde::Deserialize;
use thiserror::Error;

use crate::builder::{SchemaBuilder, Token};
use crate::detail::Detail;
use crate::error::SchemaError;
use crate::schema::TensorSchema;
use crate::signature::Signature;

/// Parameter label used in errors about return schemas.
const RETURN_LABEL: &str = "return";

/// Error while loading or building a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("cannot read manifest '{path}': {reason}")]
    Load {
        /// Path to the manifest.
        path: String,
        /// Why it could not be read.
        reason: String,
    },

    /// The manifest could not be parsed.
    #[error("invalid manifest '{path}': {reason}")]
    Parse {
        /// Path to the manifest, or `<inline>`.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A token referenced a Detail that is not registered.
    #[error("{function}({param}): no detail registered as '{detail}'")]
    UnknownDetail {
        /// Function name.
        function: String,
        /// Parameter name, or `return`.
        param: String,
        /// The unknown Detail name.
        detail: String,
    },

    /// A declared schema is structurally invalid.
    #[error("{function}({param}): {source}")]
    Schema {
        /// Function name.
        function: String,
        /// Parameter name, or `return`.
        param: String,
        /// The construction error.
        source: SchemaError,
    },

    /// No function with this name is declared.
    #[error("no function named '{0}' in manifest")]
    UnknownFunction(String),
}

/// Words that stand alone as tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    /// Any size, never bound.
    Wildcard,
    /// Zero or more leading dimensions.
    Ellipsis,
    /// The anonymous name of any size.
    Anonymous,
    /// Floating-point element type.
    IsFloat,
    /// Check axis names.
    IsNamed,
    /// Any rank.
    Open,
    /// Rank exactly 0.
    Scalar,
}

/// `{size: n}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeSpec {
    /// Fixed size, or -1 for any.
    pub size: i64,
}

/// `{name: s}` or `{name: s, size: n}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameSpec {
    /// Dimension name.
    pub name: String,
    /// Declared size.
    #[serde(default)]
    pub size: Option<usize>,
}

/// `{anonymous: n}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnonymousSpec {
    /// Declared size.
    pub anonymous: usize,
}

/// `{dtype: f32}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DtypeSpec {
    /// Exact element type.
    pub dtype: ElementType,
}

/// `{dtype_kind: float}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DtypeKindSpec {
    /// Element-type class.
    pub dtype_kind: DtypeKind,
}

/// `{layout: strided}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    /// Memory layout.
    pub layout: Layout,
}

/// `{detail: name}`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailSpec {
    /// Registered Detail name.
    pub detail: String,
}

/// Serialized form of one [`Token`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenSpec {
    /// A bare keyword.
    Keyword(Keyword),
    /// A bare integer size.
    Int(i64),
    /// A named dimension.
    Name(NameSpec),
    /// A size.
    Size(SizeSpec),
    /// An anonymous dimension with a size.
    Anonymous(AnonymousSpec),
    /// An exact element type.
    Dtype(DtypeSpec),
    /// An element-type class.
    DtypeKind(DtypeKindSpec),
    /// A memory layout.
    Layout(LayoutSpec),
    /// A registered Detail.
    Detail(DetailSpec),
}

/// One declared parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
    /// Schema tokens.
    pub schema: Vec<TokenSpec>,
}

/// One declared function.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionDecl {
    /// Constrained parameters, in order.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Return schema tokens.
    #[serde(default)]
    pub returns: Option<Vec<TokenSpec>>,
}

/// A parsed, not yet built, manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Capabilities of the array library the declarations target.
    #[serde(default)]
    pub capabilities: Option<ArrayCapabilities>,
    /// Declared functions by name.
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDecl>,
}

impl Manifest {
    /// Load a manifest, choosing YAML or JSON by file extension.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Load` if the file cannot be read and
    /// `ManifestError::Parse` if it is not a valid manifest.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Load {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match ext {
            "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| ManifestError::Parse {
            path: display,
            reason,
        })
    }

    /// Parse a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Parse` if the text is not a valid manifest.
    pub fn from_yaml_str(text: &str) -> Result<Self, ManifestError> {
        serde_yaml::from_str(text).map_err(|e| ManifestError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Parse` if the text is not a valid manifest.
    pub fn from_json_str(text: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(text).map_err(|e| ManifestError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Build every declared schema.
    ///
    /// # Errors
    ///
    /// Returns the first `ManifestError::Schema` or
    /// `ManifestError::UnknownDetail`, tagged with function and parameter.
    pub fn build(
        &self,
        registry: &DetailRegistry,
        capabilities: ArrayCapabilities,
    ) -> Result<SignatureSet, ManifestError> {
        let builder = SchemaBuilder::new(capabilities);
        let mut signatures = BTreeMap::new();

        for (function, decl) in &self.functions {
            let build = |param: &str, specs: &[TokenSpec]| -> Result<TensorSchema, ManifestError> {
                let tokens = specs
                    .iter()
                    .map(|spec| spec.to_token(registry))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|detail| ManifestError::UnknownDetail {
                        function: function.clone(),
                        param: param.to_string(),
                        detail,
                    })?;
                builder.build(tokens).map_err(|source| ManifestError::Schema {
                    function: function.clone(),
                    param: param.to_string(),
                    source,
                })
            };

            let mut signature = Signature::new(function.as_str());
            for param in &decl.params {
                signature = signature.param(param.name.as_str(), build(&param.name, &param.schema)?);
            }
            if let Some(returns) = &decl.returns {
                signature = signature.returns(build(RETURN_LABEL, returns)?);
            }
            tracing::debug!(
                function = %function,
                params = decl.params.len(),
                "declared signature"
            );
            signatures.insert(function.clone(), signature);
        }

        Ok(SignatureSet {
            capabilities,
            signatures,
        })
    }
}

impl TokenSpec {
    /// Convert to a builder token. Fails with the name of an unregistered Detail.
    pub fn to_token(&self, registry: &DetailRegistry) -> Result<Token, String> {
        Ok(match self {
            Self::Keyword(Keyword::Wildcard) => Token::Wildcard,
            Self::Keyword(Keyword::Ellipsis) => Token::Ellipsis,
            Self::Keyword(Keyword::Anonymous) => Token::Anonymous(None),
            Self::Keyword(Keyword::IsFloat) => Token::IsFloat,
            Self::Keyword(Keyword::IsNamed) => Token::IsNamed,
            Self::Keyword(Keyword::Open) => Token::Open,
            Self::Keyword(Keyword::Scalar) => Token::Scalar,
            Self::Int(size) | Self::Size(SizeSpec { size }) => Token::Size(*size),
            Self::Name(NameSpec { name, size: None }) => Token::Name(name.clone()),
            Self::Name(NameSpec {
                name,
                size: Some(size),
            }) => Token::SizedName(name.clone(), *size),
            Self::Anonymous(spec) => Token::Anonymous(Some(spec.anonymous)),
            Self::Dtype(spec) => Token::Dtype(spec.dtype),
            Self::DtypeKind(spec) => Token::DtypeKind(spec.dtype_kind),
            Self::Layout(spec) => Token::Layout(spec.layout),
            Self::Detail(spec) => Token::Detail(
                registry
                    .get(&spec.detail)
                    .ok_or_else(|| spec.detail.clone())?,
            ),
        })
    }
}

/// User Details addressable by name from manifests.
#[derive(Debug, Default, Clone)]
pub struct DetailRegistry {
    details: HashMap<String, Arc<dyn Detail>>,
}

impl DetailRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `detail` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, detail: impl Detail + 'static) {
        self.details.insert(name.into(), Arc::new(detail));
    }

    /// Look up a Detail by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Detail>> {
        self.details.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.details.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Built signatures from one manifest.
#[derive(Debug, Clone)]
pub struct SignatureSet {
    capabilities: ArrayCapabilities,
    signatures: BTreeMap<String, Signature>,
}

impl SignatureSet {
    /// Capabilities the schemas were built for.
    pub fn capabilities(&self) -> ArrayCapabilities {
        self.capabilities
    }

    /// Look up a signature.
    pub fn get(&self, function: &str) -> Option<&Signature> {
        self.signatures.get(function)
    }

    /// Look up a signature that must exist.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnknownFunction` if it is not declared.
    pub fn require(&self, function: &str) -> Result<&Signature, ManifestError> {
        self.get(function)
            .ok_or_else(|| ManifestError::UnknownFunction(function.to_string()))
    }

    /// All signatures, by name.
    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.values()
    }

    /// Number of declared functions.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no functions are declared.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
