//! Capability traits the executor is built on.
//!
//! The [`Executor`](crate::Executor) never touches the disk or spawns
//! processes directly. It goes through three small traits:
//! - [`StateLocator`] resolves the working and variables directories
//! - [`FileSystem`] writes, lists and stats files
//! - [`CommandRunner`] runs terraform with a given argument list
//!
//! Real implementations live in [`local`] and [`terraform`]; [`memory`]
//! provides in-memory fakes for testing:
//!
//! ```
//! use terrakit::backend::memory::{MemoryFs, ScriptedRunner, StaticLocator};
//! use terrakit::Executor;
//!
//! let fs = MemoryFs::new().with_dir("/env/terraform").with_dir("/env/vars");
//! let runner = ScriptedRunner::new().respond("version", "Terraform v1.5.7\n");
//! let locator = StaticLocator::new("/env/terraform", "/env/vars");
//!
//! let executor = Executor::new(Box::new(runner), Box::new(locator), Box::new(fs), false);
//! assert_eq!(executor.version().unwrap(), "1.5.7");
//! assert!(!executor.is_paved().unwrap());
//! ```

pub mod local;
pub mod memory;
pub mod terraform;

use crate::error::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Resolves the two directories the executor works in.
///
/// Both must be absolute, existing and writable.
pub trait StateLocator: Send + Sync {
    /// Directory holding the template and terraform's `.terraform` cache.
    fn working_dir(&self) -> Result<PathBuf>;

    /// Directory holding tfvars files and `terraform.tfstate`.
    fn vars_dir(&self) -> Result<PathBuf>;
}

/// Minimal file information returned by [`FileSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name without directory
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Size in bytes (0 for directories)
    pub len: u64,
}

/// Filesystem gateway.
pub trait FileSystem: Send + Sync {
    /// Write `contents` to `path`, replacing it, with unix permissions `mode`.
    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List the entries of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FileInfo>>;

    /// Get information about a single path.
    fn stat(&self, path: &Path) -> io::Result<FileInfo>;
}

/// Runs the terraform binary.
pub trait CommandRunner: Send + Sync {
    /// Run terraform with `args`, writing its standard output to `stdout`.
    ///
    /// With `debug` set, terraform's diagnostic stream must be made visible
    /// as well. Returns an error when the process cannot start or exits
    /// unsuccessfully.
    fn run(&self, stdout: &mut dyn Write, args: &[String], debug: bool) -> Result<()>;
}

/// Render arguments for logging with `-var` values hidden.
///
/// `-var name=value` becomes `-var name=<redacted>`.
pub fn display_args(args: &[String]) -> Vec<String> {
    let mut shown = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            let name = arg.split_once('=').map_or(arg.as_str(), |(n, _)| n);
            shown.push(format!("{name}=<redacted>"));
            hide_next = false;
        } else {
            hide_next = arg == "-var";
            shown.push(arg.clone());
        }
    }
    shown
}

/// Human name of a terraform invocation, e.g. `terraform apply`.
pub fn describe(args: &[String]) -> String {
    match args.first() {
        Some(sub) => format!("terraform {sub}"),
        None => "terraform".to_string(),
    }
}
