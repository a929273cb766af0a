//! # Inspect Subcommand
//!
//! Builds every schema in a manifest and prints the declared signatures.
//! Any construction error fails the command, which makes `inspect` the
//! lint step for a manifest.
//!
//! ```bash
//! dimcheck inspect signatures.yaml
//! dimcheck inspect signatures.yaml --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use dimcheck_core::ArrayCapabilities;
use dimcheck_schema::{DetailRegistry, Manifest, Signature, SignatureSet};

use crate::config::CliConfig;

/// Output format shared by the subcommands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Declaration manifest (.yaml, .yml or .json).
    pub manifest: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Load a manifest and build all of its signatures.
///
/// # Errors
///
/// Fails if the manifest cannot be loaded or any schema fails to build.
pub fn load_signatures(path: &Path, config: &CliConfig) -> Result<SignatureSet> {
    let manifest = Manifest::from_path(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    let capabilities = config.capabilities(manifest.capabilities);
    tracing::info!(
        manifest = %path.display(),
        named_axes = capabilities.named_axes,
        layouts = capabilities.layouts,
        "building declared schemas"
    );
    manifest
        .build(&DetailRegistry::new(), capabilities)
        .with_context(|| format!("invalid declaration in {}", path.display()))
}

#[derive(Debug, Serialize)]
struct SignatureSummary {
    name: String,
    params: Vec<ParamSummary>,
    returns: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParamSummary {
    name: String,
    schema: String,
}

#[derive(Debug, Serialize)]
struct ManifestSummary {
    capabilities: ArrayCapabilities,
    functions: Vec<SignatureSummary>,
}

fn summarize(signature: &Signature) -> SignatureSummary {
    SignatureSummary {
        name: signature.name().to_string(),
        params: signature
            .params()
            .iter()
            .map(|p| ParamSummary {
                name: p.name.clone(),
                schema: p.schema.to_string(),
            })
            .collect(),
        returns: signature.return_schema().map(ToString::to_string),
    }
}

/// Render the built signatures.
pub fn render_signatures(set: &SignatureSet, format: OutputFormat) -> Result<String> {
    let summary = ManifestSummary {
        capabilities: set.capabilities(),
        functions: set.iter().map(summarize).collect(),
    };
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&summary).context("failed to serialize signatures");
    }

    let mut out = String::new();
    for function in &summary.functions {
        out.push_str(&function.name);
        out.push('\n');
        for param in &function.params {
            out.push_str(&format!("  {}: {}\n", param.name, param.schema));
        }
        if let Some(returns) = &function.returns {
            out.push_str(&format!("  -> {returns}\n"));
        }
    }
    out.push_str(&format!("{} function(s) declared\n", summary.functions.len()));
    Ok(out)
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs, config: &CliConfig) -> Result<u8> {
    let set = load_signatures(&args.manifest, config)?;
    print!("{}", render_signatures(&set, args.format)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
functions:
  matmul:
    params:
      - name: a
        schema: [ellipsis, {name: n}, {name: k}]
      - name: b
        schema: [ellipsis, {name: k}, {name: m}, {dtype: f32}]
    returns: [ellipsis, {name: n}, {name: m}]
  norm:
    params:
      - name: x
        schema: [open, {dtype_kind: float}]
"#;

    fn write_manifest(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn text_rendering_lists_every_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "sig.yaml", MANIFEST);
        let set = load_signatures(&path, &CliConfig::default()).unwrap();
        let text = render_signatures(&set, OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "matmul\n  a: (..., n, k)\n  b: (..., k, m), f32\n  -> (..., n, m)\n\
             norm\n  x: any, float\n\
             2 function(s) declared\n"
        );
    }

    #[test]
    fn json_rendering_includes_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "sig.yaml", MANIFEST);
        let set = load_signatures(&path, &CliConfig::default()).unwrap();
        let json = render_signatures(&set, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["capabilities"]["named_axes"], false);
        assert_eq!(value["functions"][0]["name"], "matmul");
        assert_eq!(value["functions"][1]["returns"], serde_json::Value::Null);
    }

    #[test]
    fn construction_errors_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            &dir,
            "bad.yaml",
            "functions:\n  f:\n    params:\n      - name: x\n        schema: [{layout: strided}]\n",
        );
        let err = load_signatures(&path, &CliConfig::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("f(x)"), "{message}");
        assert!(message.contains("no memory layouts"), "{message}");

        let full = CliConfig {
            file: Some(ArrayCapabilities::FULL),
            env: None,
        };
        assert!(load_signatures(&path, &full).is_ok());
    }
}
