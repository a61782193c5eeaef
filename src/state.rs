//! State directory layout.
//!
//! ```text
//! <state dir>/
//!   terraform/          working dir: template, .terraform/
//!   vars/               tfvars files and terraform.tfstate
//!   latest-error.log    output of the last failed terraform run
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use terrakit::backend::StateLocator;

const WORKING_DIR: &str = "terraform";
const VARS_DIR: &str = "vars";
const LATEST_ERROR: &str = "latest-error.log";

/// Locates the terraform directories under a state root.
///
/// Directories are created on lookup, so a fresh root works for every
/// command.
#[derive(Debug, Clone)]
pub struct StateDirs {
    root: PathBuf,
}

impl StateDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the terraform runner records its last failure.
    pub fn latest_error_path(&self) -> PathBuf {
        self.root.join(LATEST_ERROR)
    }

    fn ensure(&self, name: &str) -> terrakit::Result<PathBuf> {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).map_err(|e| terrakit::Error::io("create state directory", e))?;
        std::path::absolute(&dir).map_err(|e| terrakit::Error::io("resolve state directory", e))
    }
}

impl StateLocator for StateDirs {
    fn working_dir(&self) -> terrakit::Result<PathBuf> {
        self.ensure(WORKING_DIR)
    }

    fn vars_dir(&self) -> terrakit::Result<PathBuf> {
        self.ensure(VARS_DIR)
    }
}
