//! In-memory fakes for testing without disk or processes.
//!
//! All fakes are cheap to clone and share their state, so a test can hand
//! one clone to the [`Executor`](crate::Executor) and inspect another.

use crate::backend::{CommandRunner, FileInfo, FileSystem, StateLocator, describe};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct FsState {
    files: BTreeMap<PathBuf, (Vec<u8>, u32)>,
    dirs: BTreeSet<PathBuf>,
    failing: BTreeSet<PathBuf>,
}

/// In-memory filesystem.
///
/// Writes require the parent directory to exist, like a real filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    state: Arc<Mutex<FsState>>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory (and its parents).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        let mut state = lock(&self.state);
        for ancestor in path.as_ref().ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
        drop(state);
        self
    }

    /// Add a file with the given contents.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        lock(&self.state)
            .files
            .insert(path.as_ref().to_path_buf(), (contents.into(), 0o644));
        self
    }

    /// Make every write or directory creation at `path` fail.
    pub fn fail_on(self, path: impl AsRef<Path>) -> Self {
        lock(&self.state)
            .failing
            .insert(path.as_ref().to_path_buf());
        self
    }

    /// Read a file's contents.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        lock(&self.state)
            .files
            .get(path.as_ref())
            .map(|(contents, _)| contents.clone())
    }

    /// Read a file as UTF-8 text.
    pub fn read_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Permissions a file was written with.
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        lock(&self.state)
            .files
            .get(path.as_ref())
            .map(|(_, mode)| *mode)
    }

    /// Whether a directory exists.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        lock(&self.state).dirs.contains(path.as_ref())
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        lock(&self.state).files.keys().cloned().collect()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn injected_failure(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
    )
}

impl FileSystem for MemoryFs {
    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        let mut state = lock(&self.state);
        if state.failing.contains(path) {
            return Err(injected_failure(path));
        }
        let parent = path.parent().unwrap_or(Path::new(""));
        if !state.dirs.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", parent.display()),
            ));
        }
        state
            .files
            .insert(path.to_path_buf(), (contents.to_vec(), mode));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = lock(&self.state);
        if state.failing.contains(path) {
            return Err(injected_failure(path));
        }
        for ancestor in path.ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FileInfo>> {
        let state = lock(&self.state);
        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            ));
        }

        let dirs = state
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(path))
            .map(|d| FileInfo {
                name: file_name(d),
                is_dir: true,
                len: 0,
            });
        let files = state
            .files
            .iter()
            .filter(|(f, _)| f.parent() == Some(path))
            .map(|(f, (contents, _))| FileInfo {
                name: file_name(f),
                is_dir: false,
                len: contents.len() as u64,
            });

        Ok(dirs.chain(files).collect())
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let state = lock(&self.state);
        if let Some((contents, _)) = state.files.get(path) {
            return Ok(FileInfo {
                name: file_name(path),
                is_dir: false,
                len: contents.len() as u64,
            });
        }
        if state.dirs.contains(path) {
            return Ok(FileInfo {
                name: file_name(path),
                is_dir: true,
                len: 0,
            });
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such file: {}", path.display()),
        ))
    }
}

/// Locator returning fixed paths, optionally failing.
#[derive(Debug, Clone)]
pub struct StaticLocator {
    working_dir: Option<PathBuf>,
    vars_dir: Option<PathBuf>,
}

impl StaticLocator {
    /// Locator for the given working and variables directories.
    pub fn new(working_dir: impl Into<PathBuf>, vars_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(working_dir.into()),
            vars_dir: Some(vars_dir.into()),
        }
    }

    /// Make working directory lookups fail.
    pub fn without_working_dir(mut self) -> Self {
        self.working_dir = None;
        self
    }

    /// Make variables directory lookups fail.
    pub fn without_vars_dir(mut self) -> Self {
        self.vars_dir = None;
        self
    }
}

fn unresolved(what: &'static str) -> Error {
    Error::io(
        what,
        io::Error::new(io::ErrorKind::NotFound, "directory not configured"),
    )
}

impl StateLocator for StaticLocator {
    fn working_dir(&self) -> Result<PathBuf> {
        self.working_dir
            .clone()
            .ok_or_else(|| unresolved("resolve working directory"))
    }

    fn vars_dir(&self) -> Result<PathBuf> {
        self.vars_dir
            .clone()
            .ok_or_else(|| unresolved("resolve vars directory"))
    }
}

/// A recorded invocation of [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCall {
    /// Arguments passed to terraform
    pub args: Vec<String>,
    /// Debug flag passed with the call
    pub debug: bool,
}

#[derive(Debug, Clone, Default)]
struct Script {
    stdout: String,
    stderr: String,
    failure: Option<String>,
}

/// Command runner that replays canned responses keyed by subcommand.
///
/// Like [`TerraformCli`](crate::backend::terraform::TerraformCli), diagnostic
/// text registered with [`ScriptedRunner::stderr`] never reaches the sink.
/// Calls made in debug mode surface it, readable through
/// [`ScriptedRunner::echoed`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<Vec<RunCall>>>,
    echoed: Arc<Mutex<String>>,
}

impl ScriptedRunner {
    /// Create a runner where every subcommand succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Print `stdout` when `subcommand` runs.
    pub fn respond(self, subcommand: &str, stdout: impl Into<String>) -> Self {
        lock(&self.scripts)
            .entry(subcommand.to_string())
            .or_default()
            .stdout = stdout.into();
        self
    }

    /// Emit `stderr` on the diagnostic stream when `subcommand` runs.
    pub fn stderr(self, subcommand: &str, stderr: impl Into<String>) -> Self {
        lock(&self.scripts)
            .entry(subcommand.to_string())
            .or_default()
            .stderr = stderr.into();
        self
    }

    /// Fail `subcommand` with `message`.
    pub fn fail(self, subcommand: &str, message: impl Into<String>) -> Self {
        lock(&self.scripts)
            .entry(subcommand.to_string())
            .or_default()
            .failure = Some(message.into());
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RunCall> {
        lock(&self.calls).clone()
    }

    /// Argument lists of all calls made so far.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|c| c.args).collect()
    }

    /// Diagnostic text surfaced by debug-mode calls so far.
    pub fn echoed(&self) -> String {
        lock(&self.echoed).clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, stdout: &mut dyn Write, args: &[String], debug: bool) -> Result<()> {
        lock(&self.calls).push(RunCall {
            args: args.to_vec(),
            debug,
        });

        let script = args
            .first()
            .and_then(|sub| lock(&self.scripts).get(sub).cloned())
            .unwrap_or_default();

        stdout
            .write_all(script.stdout.as_bytes())
            .map_err(|e| Error::io("write terraform output", e))?;
        if debug {
            lock(&self.echoed).push_str(&script.stderr);
        }

        match script.failure {
            Some(message) => Err(Error::command_failed(describe(args), message)),
            None => Ok(()),
        }
    }
}
