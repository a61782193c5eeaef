//! Command runner that executes the real `terraform` binary.

use crate::backend::{CommandRunner, describe, display_args};
use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Runs terraform as a subprocess.
///
/// Standard output is streamed into the caller's sink. Standard error is
/// always captured for error messages; in debug mode it is also echoed to
/// this process's stderr as it arrives.
#[derive(Debug, Clone)]
pub struct TerraformCli {
    binary: PathBuf,
    error_log: Option<PathBuf>,
}

impl TerraformCli {
    /// Create a runner for the given binary (a path or a name on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            error_log: None,
        }
    }

    /// Record the output of every failed run at `path`.
    pub fn with_error_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log = Some(path.into());
        self
    }

    /// Overwrite the error log with this failure. Called on every failure
    /// path so the log never shows an older run.
    fn record_failure(&self, command: &str, stdout: &[u8], stderr: &[u8]) {
        let Some(path) = &self.error_log else {
            return;
        };

        let mut log = format!(
            "# {}\n# command: {command}\n\n--- stdout ---\n",
            chrono::Utc::now().to_rfc3339()
        );
        log.push_str(&String::from_utf8_lossy(stdout));
        log.push_str("\n--- stderr ---\n");
        log.push_str(&String::from_utf8_lossy(stderr));

        if let Err(e) = write_private(path, log.as_bytes()) {
            log::warn!("Failed to write {}: {e}", path.display());
        }
    }
}

impl Default for TerraformCli {
    fn default() -> Self {
        Self::new("terraform")
    }
}

fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Writer that forwards to a sink while keeping a copy.
struct Tee<'a> {
    sink: &'a mut dyn Write,
    copy: Vec<u8>,
}

impl Write for Tee<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.sink.write(buf)?;
        self.copy.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

impl CommandRunner for TerraformCli {
    fn run(&self, stdout: &mut dyn Write, args: &[String], debug: bool) -> Result<()> {
        let command = describe(args);
        log::debug!(
            "Running: {} {}",
            self.binary.display(),
            display_args(args).join(" ")
        );

        let spawned = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let message = if e.kind() == io::ErrorKind::NotFound {
                    format!("terraform binary not found: {}", self.binary.display())
                } else {
                    format!("failed to start: {e}")
                };
                self.record_failure(&command, b"", message.as_bytes());
                return Err(Error::command_failed(command, message));
            }
        };

        let child_stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || {
            let mut captured = Vec::new();
            let Some(mut pipe) = child_stderr else {
                return captured;
            };
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if debug {
                            let _ = io::stderr().write_all(&chunk[..n]);
                        }
                        captured.extend_from_slice(&chunk[..n]);
                    }
                }
            }
            captured
        });

        let mut tee = Tee {
            sink: stdout,
            copy: Vec::new(),
        };
        let copied = match child.stdout.take() {
            Some(mut pipe) => io::copy(&mut pipe, &mut tee).map(|_| ()),
            None => Ok(()),
        };

        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => {
                let note = format!("wait for terraform: {e}");
                self.record_failure(&command, &tee.copy, note.as_bytes());
                return Err(Error::io("wait for terraform", e));
            }
        };
        let mut stderr = stderr_reader.join().unwrap_or_default();

        if let Err(e) = copied {
            stderr.extend_from_slice(format!("\nstream terraform output: {e}\n").as_bytes());
            self.record_failure(&command, &tee.copy, &stderr);
            return Err(Error::io("stream terraform output", e));
        }

        if status.success() {
            return Ok(());
        }

        self.record_failure(&command, &tee.copy, &stderr);

        let stderr_text = String::from_utf8_lossy(&stderr);
        let message = match stderr_text.trim() {
            "" => format!("exited with {status}"),
            text => text.to_string(),
        };
        Err(Error::command_failed(command, message))
    }
}
