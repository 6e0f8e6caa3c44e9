// Suite table configuration for the harness
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_EXT: &str = "in";
pub const DEFAULT_EXPECTED_EXT: &str = "expected";

/// One entry of the suite table: a fixture root tied to one
/// optimization kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite name used in reports and logs.
    pub name: String,
    /// Fixture root directory. Resolved once at startup, never re-derived
    /// from the working directory mid-run.
    pub root: PathBuf,
    /// Optimization pass name, looked up in the pass registry.
    pub pass: String,
    #[serde(default = "default_input_ext")]
    pub input_ext: String,
    #[serde(default = "default_expected_ext")]
    pub expected_ext: String,
}

fn default_input_ext() -> String {
    DEFAULT_INPUT_EXT.to_string()
}

fn default_expected_ext() -> String {
    DEFAULT_EXPECTED_EXT.to_string()
}

/// The whole harness configuration. Adding an optimization kind means
/// adding a table entry, not new control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub suites: Vec<SuiteConfig>,
}

impl HarnessConfig {
    /// Load the suite table from a JSON file.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("harness config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let config: HarnessConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        if config.suites.is_empty() {
            bail!("harness config declares no suites: {}", config_path.display());
        }

        Ok(config)
    }

    /// Load with the default path (`optcheck.json`).
    pub fn load_default() -> Result<Self> {
        Self::load(Path::new("optcheck.json"))
    }
}
