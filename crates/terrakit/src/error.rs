//! Error types for terraform lifecycle operations.
//!
//! Errors are grouped into categories so callers can tell a broken
//! configuration from a failed subprocess or an unreadable output. The
//! mutating commands (apply and destroy) collapse subprocess failures into
//! [`Error::Redacted`] unless the executor runs in debug mode, because
//! terraform may echo credentials in its diagnostics.

use std::io;
use thiserror::Error;

/// Message returned in place of a failed apply/destroy when not in debug mode.
pub const REDACTED_MESSAGE: &str = "Some output has been redacted, use `paver latest-error` to see it or run again with --debug for additional debug output";

/// Categories of executor errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A state directory could not be resolved
    Config,
    /// Filesystem write/create/read failure
    Io,
    /// The terraform subprocess failed
    Command,
    /// A subprocess failure whose details were withheld
    Redacted,
    /// The subprocess succeeded but its output could not be decoded
    Decode,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Config => "State directory unavailable",
            Self::Io => "Filesystem error",
            Self::Command => "Terraform command failed",
            Self::Redacted => "Terraform command failed (output redacted)",
            Self::Decode => "Unreadable terraform output",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Config => "Check that the state directory exists and is writable",
            Self::Io => "Check directory permissions and free disk space",
            Self::Command => "Inspect the terraform error above and fix the template or variables",
            Self::Redacted => "Run `paver latest-error` or re-run with --debug",
            Self::Decode => "Check that the installed terraform version is supported",
        }
    }
}

/// Errors that can occur while driving terraform.
#[derive(Debug, Error)]
pub enum Error {
    /// A state directory lookup failed
    #[error("get {dir}: {source}")]
    Lookup {
        /// Which directory was being resolved ("terraform dir", "vars dir")
        dir: &'static str,
        /// Underlying failure reported by the locator
        #[source]
        source: Box<Error>,
    },

    /// Filesystem failure during a named step
    #[error("{step}: {source}")]
    Io {
        /// The step that failed, e.g. "write terraform template"
        step: &'static str,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A mutating command failed and its output was withheld
    #[error("{}", REDACTED_MESSAGE)]
    Redacted,

    /// The terraform subprocess exited unsuccessfully or could not start
    #[error("{command} failed: {message}")]
    CommandFailed {
        /// The subcommand that ran, e.g. "terraform init"
        command: String,
        /// Diagnostic output or exit status
        message: String,
    },

    /// A non-redacted subcommand failed
    #[error("{step}: {source}")]
    Subcommand {
        /// The step that failed, e.g. "run terraform init"
        step: &'static str,
        /// Failure reported by the command runner
        #[source]
        source: Box<Error>,
    },

    /// Structured output could not be decoded
    #[error("decode {what}: {message}")]
    Decode {
        /// What was being decoded
        what: &'static str,
        /// Parser message
        message: String,
    },

    /// `terraform version` printed nothing shaped like a version
    #[error("terraform version could not be parsed")]
    VersionNotFound,
}

impl Error {
    /// Build an [`Error::Io`] for a named step.
    pub fn io(step: &'static str, source: io::Error) -> Self {
        Error::Io { step, source }
    }

    /// Build an [`Error::CommandFailed`].
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    pub(crate) fn lookup(dir: &'static str, source: Error) -> Self {
        Error::Lookup {
            dir,
            source: Box::new(source),
        }
    }

    pub(crate) fn subcommand(step: &'static str, source: Error) -> Self {
        Error::Subcommand {
            step,
            source: Box::new(source),
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Lookup { .. } => ErrorCategory::Config,
            Error::Io { .. } => ErrorCategory::Io,
            Error::Redacted => ErrorCategory::Redacted,
            Error::CommandFailed { .. } | Error::Subcommand { .. } => ErrorCategory::Command,
            Error::Decode { .. } | Error::VersionNotFound => ErrorCategory::Decode,
        }
    }

    /// Whether the underlying details were withheld.
    pub fn is_redacted(&self) -> bool {
        matches!(self, Error::Redacted)
    }
}

/// Result type for terraform operations.
pub type Result<T> = std::result::Result<T, Error>;
