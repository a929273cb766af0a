//! CLI configuration.
//!
//! The only setting is the capability profile of the target array library.
//! It is resolved in this order:
//!
//! 1. the `capabilities:` section of the `--config` file,
//! 2. the `capabilities:` section of the manifest being loaded,
//! 3. `DIMCHECK_NAMED_AXES` / `DIMCHECK_LAYOUTS` from the environment,
//! 4. [`ArrayCapabilities::PLAIN`].

use std::path::Path;

use dimcheck_core::ArrayCapabilities;
use serde::Deserialize;

/// Environment variable enabling axis names.
pub const ENV_NAMED_AXES: &str = "DIMCHECK_NAMED_AXES";
/// Environment variable enabling memory layouts.
pub const ENV_LAYOUTS: &str = "DIMCHECK_LAYOUTS";

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    capabilities: Option<ArrayCapabilities>,
}

/// Capability settings gathered from the config file and the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// From the `--config` file.
    pub file: Option<ArrayCapabilities>,
    /// From `DIMCHECK_*` environment variables.
    pub env: Option<ArrayCapabilities>,
}

impl CliConfig {
    /// Read the optional config file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or an
    /// environment variable holds something other than a boolean.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => Self::read_file(path)?,
            None => None,
        };
        let env = Self::from_env()?.env;
        Ok(Self { file, env })
    }

    /// Load only the environment part.
    ///
    /// Variables:
    /// - `DIMCHECK_NAMED_AXES` (`true`/`false`/`1`/`0`, default: false)
    /// - `DIMCHECK_LAYOUTS` (`true`/`false`/`1`/`0`, default: false)
    ///
    /// If neither is set the environment contributes nothing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let named_axes = lookup(ENV_NAMED_AXES);
        let layouts = lookup(ENV_LAYOUTS);
        if named_axes.is_none() && layouts.is_none() {
            return Ok(Self::default());
        }
        let env = ArrayCapabilities {
            named_axes: env_bool(ENV_NAMED_AXES, named_axes.as_deref())?,
            layouts: env_bool(ENV_LAYOUTS, layouts.as_deref())?,
        };
        Ok(Self {
            file: None,
            env: Some(env),
        })
    }

    fn read_file(path: &Path) -> Result<Option<ArrayCapabilities>, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let parsed: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        Ok(parsed.capabilities)
    }

    /// Capabilities to build with, given what the manifest declares.
    pub fn capabilities(&self, manifest: Option<ArrayCapabilities>) -> ArrayCapabilities {
        self.file
            .or(manifest)
            .or(self.env)
            .unwrap_or(ArrayCapabilities::PLAIN)
    }
}

fn env_bool(var: &str, value: Option<&str>) -> Result<bool, ConfigError> {
    match value.map(str::trim) {
        None => Ok(false),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidBool(var.to_string(), other.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {0}: {1}")]
    Read(String, String),
    #[error("invalid config file {0}: {1}")]
    Parse(String, String),
    #[error("{0} must be true, false, 1 or 0, got '{1}'")]
    InvalidBool(String, String),
}
