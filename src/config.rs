//! User configuration for paver.
//!
//! Settings come from `<config dir>/config.toml`, overridden by environment
//! variables and command-line flags (clap resolves those two together).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// On-disk configuration. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaverConfig {
    /// Terraform binary, a path or a name on `PATH`
    pub terraform: Option<String>,
    /// Root of the state directory (supports `~` and `$VARS`)
    pub state_dir: Option<String>,
    /// Run terraform in debug mode by default
    pub debug: Option<bool>,
}

impl PaverConfig {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub terraform: Option<String>,
    pub state_dir: Option<String>,
    pub debug: bool,
}

/// Fully resolved settings used by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub terraform: PathBuf,
    pub state_dir: PathBuf,
    pub debug: bool,
}

impl Settings {
    /// Resolve settings: overrides first, then the config file, then defaults.
    pub fn resolve(config: &PaverConfig, overrides: &Overrides) -> Result<Self> {
        let terraform = overrides
            .terraform
            .as_deref()
            .or(config.terraform.as_deref())
            .map_or_else(|| PathBuf::from("terraform"), paths::expand);

        let state_dir = match overrides
            .state_dir
            .as_deref()
            .or(config.state_dir.as_deref())
        {
            Some(dir) => paths::expand(dir),
            None => paths::default_state_root()?,
        };

        let debug = overrides.debug || config.debug.unwrap_or(false);

        Ok(Self {
            terraform,
            state_dir,
            debug,
        })
    }
}
