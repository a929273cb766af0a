//! # Check Subcommand
//!
//! Validates described arrays against one declared function signature, the
//! way an interceptor would validate a real call: one fresh set of bindings,
//! every argument in order, then the return value.
//!
//! ```bash
//! dimcheck check signatures.yaml --function matmul \
//!     --arg 8x2x3:f32 --arg 3x4:f32 --ret 8x2x4:f32
//! ```
//!
//! Array descriptions are `<dims>:<dtype>` (`2x3:f32`, `scalar:i64`),
//! optionally followed, in either order, by `@<layout>` and `#<axis names>`
//! (`_` = unnamed).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dimcheck_core::{ArrayLike, ArrayMeta};
use dimcheck_schema::{BindingEnvironment, SignatureSet};

use crate::config::CliConfig;
use crate::inspect::{load_signatures, OutputFormat};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Declaration manifest (.yaml, .yml or .json).
    pub manifest: PathBuf,

    /// Declared function to check the call against.
    #[arg(long)]
    pub function: String,

    /// Argument description, once per constrained parameter, in order.
    #[arg(long = "arg", value_name = "DESC")]
    pub args: Vec<String>,

    /// Return value description.
    #[arg(long = "ret", value_name = "DESC")]
    pub ret: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Verdict for one checked call.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Function that was checked.
    pub function: String,
    /// Whether every argument and the return value matched.
    pub ok: bool,
    /// Name bindings established by a successful call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BindingEnvironment>,
    /// The first failure, rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckReport {
    /// Render the report as text or JSON.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        if format == OutputFormat::Json {
            return serde_json::to_string_pretty(self).context("failed to serialize report");
        }
        let mut out = String::new();
        match (&self.bindings, &self.error) {
            (_, Some(error)) => out.push_str(&format!("FAIL {error}\n")),
            (bindings, None) => {
                out.push_str(&format!("OK {}()\n", self.function));
                for (name, size) in bindings.iter().flat_map(|env| env.iter()) {
                    out.push_str(&format!("  {name} = {size}\n"));
                }
            }
        }
        Ok(out)
    }
}

fn parse_array(description: &str) -> Result<ArrayMeta> {
    description
        .parse::<ArrayMeta>()
        .with_context(|| format!("invalid array description '{description}'"))
}

/// Check one call described by `args` against the built signatures.
///
/// # Errors
///
/// Fails on unknown functions and malformed array descriptions. A call
/// that does not match is reported, not returned as an error.
pub fn check_call(set: &SignatureSet, args: &CheckArgs) -> Result<CheckReport> {
    let signature = set.require(&args.function)?;
    let arrays = args
        .args
        .iter()
        .map(|d| parse_array(d))
        .collect::<Result<Vec<_>>>()?;
    let ret = args.ret.as_deref().map(parse_array).transpose()?;

    let refs: Vec<&dyn ArrayLike> = arrays.iter().map(|a| a as &dyn ArrayLike).collect();
    let verdict = signature.check_call(&refs, ret.as_ref().map(|r| r as &dyn ArrayLike));

    Ok(match verdict {
        Ok(bindings) => {
            tracing::info!(function = %args.function, bound = bindings.len(), "call matches");
            CheckReport {
                function: args.function.clone(),
                ok: true,
                bindings: Some(bindings),
                error: None,
            }
        }
        Err(e) => {
            tracing::info!(function = %args.function, error = %e, "call does not match");
            CheckReport {
                function: args.function.clone(),
                ok: false,
                bindings: None,
                error: Some(e.to_string()),
            }
        }
    })
}

/// Execute the check subcommand. Exits 1 when the call does not match.
pub fn run_check(args: &CheckArgs, config: &CliConfig) -> Result<u8> {
    let set = load_signatures(&args.manifest, config)?;
    let report = check_call(&set, args)?;
    print!("{}", report.render(args.format)?);
    Ok(if report.ok { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
functions:
  func:
    params:
      - name: x
        schema: [{name: dim1}, {name: dim2}, {name: dim2}]
      - name: y
        schema: [-1, {name: dim2}]
"#;

    fn signatures() -> SignatureSet {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.yaml");
        std::fs::write(&path, MANIFEST).unwrap();
        load_signatures(&path, &CliConfig::default()).unwrap()
    }

    fn args(arrays: &[&str]) -> CheckArgs {
        CheckArgs {
            manifest: PathBuf::from("unused.yaml"),
            function: "func".to_string(),
            args: arrays.iter().map(|s| s.to_string()).collect(),
            ret: None,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn matching_call_reports_bindings() {
        let report = check_call(&signatures(), &args(&["5x3x3:f32", "9x3:f32"])).unwrap();
        assert!(report.ok);
        assert_eq!(
            report.render(OutputFormat::Text).unwrap(),
            "OK func()\n  dim1 = 5\n  dim2 = 3\n"
        );
        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["bindings"]["dim2"], 3);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn mismatching_call_reports_the_failure() {
        let report = check_call(&signatures(), &args(&["4x5x5:f32", "3x3:f32"])).unwrap();
        assert!(!report.ok);
        let text = report.render(OutputFormat::Text).unwrap();
        assert!(text.starts_with("FAIL argument 'y' of func():"), "{text}");
        assert!(text.contains("'dim2' is 5"), "{text}");
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let report = check_call(&signatures(), &args(&["4x5x5:f32"])).unwrap();
        assert!(!report.ok);
        assert_eq!(
            report.error.as_deref(),
            Some("func() takes 2 constrained arguments, got 1")
        );
    }

    #[test]
    fn malformed_description_and_unknown_function_are_errors() {
        assert!(check_call(&signatures(), &args(&["4x5x5", "3x3:f32"])).is_err());

        let mut unknown = args(&[]);
        unknown.function = "conv".to_string();
        let err = check_call(&signatures(), &unknown).unwrap_err();
        assert!(err.to_string().contains("conv"));
    }
}
