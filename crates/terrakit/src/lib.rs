//! # terrakit
//!
//! Drive the `terraform` CLI through a repeatable lifecycle.
//!
//! This crate provides:
//! - Staging a template and a tfvars file in a fixed directory layout
//! - Running `init`, `apply` and `destroy` with the right `-state` and
//!   `-var-file` flags
//! - Decoding `terraform output` and `terraform version`
//! - Redacting apply/destroy failures, which can echo credentials, unless
//!   debug mode is on
//!
//! ## Layout
//!
//! ```text
//! <working dir>/
//!   paver-template.tf
//!   .terraform/.gitignore      ("*\n")
//! <vars dir>/
//!   paver.tfvars
//!   <other>.tfvars ...
//!   terraform.tfstate          (written by terraform after apply)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use terrakit::backend::local::LocalFs;
//! use terrakit::backend::memory::StaticLocator;
//! use terrakit::backend::terraform::TerraformCli;
//! use terrakit::{Credentials, Executor, VarValue, Variables};
//!
//! let executor = Executor::new(
//!     Box::new(TerraformCli::default()),
//!     Box::new(StaticLocator::new("/srv/env/terraform", "/srv/env/vars")),
//!     Box::new(LocalFs::new()),
//!     false,
//! );
//!
//! let mut vars = Variables::new();
//! vars.insert("env_id".to_string(), VarValue::from("lake"));
//! vars.insert("zones".to_string(), VarValue::from(vec!["us-east1-b", "us-east1-c"]));
//!
//! executor.setup(r#"variable "env_id" {}"#, &vars).unwrap();
//! executor.init().unwrap();
//! executor.apply(&Credentials::new()).unwrap();
//!
//! for (name, value) in executor.outputs().unwrap() {
//!     println!("{name} = {value}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod executor;
pub mod output;
pub mod types;
pub mod vars;

pub use error::{Error, ErrorCategory, REDACTED_MESSAGE, Result};
pub use executor::Executor;
pub use types::{Credentials, OutputEntry, Outputs, VarValue, Variables};
pub use vars::format_vars;
