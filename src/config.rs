use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level `sos-priors.toml` configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SosPriorsConfig {
    /// Exchange-file packing settings.
    #[serde(default)]
    pub pack: PackToml,

    /// SoS merge settings.
    #[serde(default)]
    pub merge: MergeToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackToml {
    pub author: Option<String>,
    pub contact: Option<String>,
    pub sos_file: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PackToml {
    fn default() -> Self {
        Self {
            author: None,
            contact: None,
            sos_file: None,
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeToml {
    pub sos_dir: Option<PathBuf>,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
}

impl Default for MergeToml {
    fn default() -> Self {
        Self {
            sos_dir: None,
            rtol: default_rtol(),
            atol: default_atol(),
        }
    }
}

fn default_rtol() -> f64 {
    1e-5
}
fn default_atol() -> f64 {
    1e-8
}

/// Reads the configuration file, falling back to defaults if it does not
/// exist.
pub fn load(path: &Path) -> Result<SosPriorsConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SosPriorsConfig::default());
    }
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}
