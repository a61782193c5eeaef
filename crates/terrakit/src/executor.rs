//! The terraform lifecycle: setup, init, apply, destroy and output retrieval.

use crate::backend::{CommandRunner, FileSystem, StateLocator, display_args};
use crate::error::{Error, Result};
use crate::output::{parse_outputs, parse_version, trim_output};
use crate::types::{Credentials, Outputs, Variables};
use crate::vars::format_vars;
use std::io;
use std::path::{Path, PathBuf};

/// Template file name inside the working directory.
pub const TEMPLATE_FILE: &str = "paver-template.tf";

/// Generated variables file inside the variables directory.
pub const VARS_FILE: &str = "paver.tfvars";

/// Terraform state file inside the variables directory.
pub const STATE_FILE: &str = "terraform.tfstate";

/// Terraform's private cache directory inside the working directory.
pub const CACHE_DIR: &str = ".terraform";

/// Suffix of variable files passed with `-var-file`.
pub const VARS_SUFFIX: &str = ".tfvars";

/// Permissions for files written by the executor.
pub const FILE_MODE: u32 = 0o644;

const CACHE_GITIGNORE: &[u8] = b"*\n";

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn args_of(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| (*a).to_string()).collect()
}

/// Drives terraform through its lifecycle.
///
/// The executor holds no state between calls; everything lives in the two
/// directories returned by the [`StateLocator`]. Running two executors
/// against the same directories at once is not supported.
pub struct Executor {
    cmd: Box<dyn CommandRunner>,
    locator: Box<dyn StateLocator>,
    fs: Box<dyn FileSystem>,
    debug: bool,
}

impl Executor {
    /// Create an executor.
    ///
    /// With `debug` off, apply/destroy failures are replaced by
    /// [`Error::Redacted`].
    pub fn new(
        cmd: Box<dyn CommandRunner>,
        locator: Box<dyn StateLocator>,
        fs: Box<dyn FileSystem>,
        debug: bool,
    ) -> Self {
        Self {
            cmd,
            locator,
            fs,
            debug,
        }
    }

    fn terraform_dir(&self) -> Result<PathBuf> {
        self.locator
            .working_dir()
            .map_err(|e| Error::lookup("terraform dir", e))
    }

    fn vars_dir(&self) -> Result<PathBuf> {
        self.locator
            .vars_dir()
            .map_err(|e| Error::lookup("vars dir", e))
    }

    // =========================================================================
    // Staging
    // =========================================================================

    /// Write the template and variables to disk.
    ///
    /// Re-running with the same input rewrites identical files. Nothing is
    /// rolled back when a later step fails.
    pub fn setup(&self, template: &str, vars: &Variables) -> Result<()> {
        let terraform_dir = self.terraform_dir()?;
        self.fs
            .write_file(
                &terraform_dir.join(TEMPLATE_FILE),
                template.as_bytes(),
                FILE_MODE,
            )
            .map_err(|e| Error::io("write terraform template", e))?;

        let vars_dir = self.vars_dir()?;

        let cache_dir = terraform_dir.join(CACHE_DIR);
        self.fs
            .create_dir_all(&cache_dir)
            .map_err(|e| Error::io("create .terraform directory", e))?;
        self.fs
            .write_file(&cache_dir.join(".gitignore"), CACHE_GITIGNORE, FILE_MODE)
            .map_err(|e| Error::io("write .gitignore for terraform binaries", e))?;

        self.fs
            .write_file(
                &vars_dir.join(VARS_FILE),
                format_vars(vars).as_bytes(),
                FILE_MODE,
            )
            .map_err(|e| Error::io("write terraform vars", e))?;

        log::debug!(
            "Staged template in {} and {} variables in {}",
            terraform_dir.display(),
            vars.len(),
            vars_dir.display()
        );
        Ok(())
    }

    /// Run `terraform init` in the working directory.
    pub fn init(&self) -> Result<()> {
        let terraform_dir = self.terraform_dir()?;
        self.cmd
            .run(
                &mut io::stdout(),
                &[String::from("init"), path_arg(&terraform_dir)],
                self.debug,
            )
            .map_err(|e| Error::subcommand("run terraform init", e))
    }

    // =========================================================================
    // Mutating commands
    // =========================================================================

    /// Run `terraform apply` with credentials passed as `-var` flags.
    pub fn apply(&self, credentials: &Credentials) -> Result<()> {
        let mut args = args_of(&["apply", "--auto-approve"]);
        push_credentials(&mut args, credentials);
        self.run_mutating(args)
    }

    /// Run `terraform destroy` with credentials passed as `-var` flags.
    pub fn destroy(&self, credentials: &Credentials) -> Result<()> {
        let mut args = args_of(&["destroy", "-force"]);
        push_credentials(&mut args, credentials);
        self.run_mutating(args)
    }

    /// Append state, var-file and directory arguments to `args`.
    ///
    /// Every `*.tfvars` file in the variables directory is passed, sorted by
    /// name, whether or not the executor wrote it.
    fn assemble(&self, mut args: Vec<String>) -> Result<Vec<String>> {
        let vars_dir = self.vars_dir()?;

        args.push("-state".to_string());
        args.push(path_arg(&vars_dir.join(STATE_FILE)));

        let mut var_files: Vec<String> = self
            .fs
            .read_dir(&vars_dir)
            .map_err(|e| Error::io("read contents of vars directory", e))?
            .into_iter()
            .filter(|entry| !entry.is_dir && entry.name.ends_with(VARS_SUFFIX))
            .map(|entry| entry.name)
            .collect();
        var_files.sort();

        for name in var_files {
            args.push("-var-file".to_string());
            args.push(path_arg(&vars_dir.join(name)));
        }

        let terraform_dir = self.terraform_dir()?;
        args.push(path_arg(&terraform_dir));

        Ok(args)
    }

    fn run_mutating(&self, args: Vec<String>) -> Result<()> {
        let args = self.assemble(args)?;
        log::debug!("terraform {}", display_args(&args).join(" "));

        match self.cmd.run(&mut io::stdout(), &args, self.debug) {
            Ok(()) => Ok(()),
            Err(e) if self.debug => Err(e),
            Err(_) => Err(Error::Redacted),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get a single output value as text.
    pub fn output(&self, name: &str) -> Result<String> {
        let terraform_dir = self.terraform_dir()?;
        let vars_dir = self.vars_dir()?;

        // Progress from the preparatory init goes to stderr so stdout only
        // carries the value.
        self.cmd
            .run(
                &mut io::stderr(),
                &[String::from("init"), path_arg(&terraform_dir)],
                self.debug,
            )
            .map_err(|e| Error::subcommand("run terraform init in terraform dir", e))?;

        let args = vec![
            "output".to_string(),
            name.to_string(),
            "-state".to_string(),
            path_arg(&vars_dir.join(STATE_FILE)),
            path_arg(&terraform_dir),
        ];
        let mut buffer = Vec::new();
        self.cmd
            .run(&mut buffer, &args, true)
            .map_err(|e| Error::subcommand("run terraform output -state", e))?;

        Ok(trim_output(&String::from_utf8_lossy(&buffer)).to_string())
    }

    /// Get every output value, without sensitivity or type information.
    pub fn outputs(&self) -> Result<Outputs> {
        let vars_dir = self.vars_dir()?;

        self.cmd
            .run(
                &mut io::stderr(),
                &[String::from("init"), path_arg(&vars_dir)],
                false,
            )
            .map_err(|e| Error::subcommand("run terraform init in vars dir", e))?;

        let args = vec![
            "output".to_string(),
            "--json".to_string(),
            "-state".to_string(),
            path_arg(&vars_dir.join(STATE_FILE)),
        ];
        let mut buffer = Vec::new();
        self.cmd
            .run(&mut buffer, &args, true)
            .map_err(|e| Error::subcommand("run terraform output --json in vars dir", e))?;

        parse_outputs(&buffer)
    }

    /// Get the installed terraform version, e.g. `1.5.7`.
    pub fn version(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.cmd
            .run(&mut buffer, &[String::from("version")], true)
            .map_err(|e| Error::subcommand("run terraform version", e))?;

        parse_version(&String::from_utf8_lossy(&buffer))
    }

    /// Whether a state file exists, i.e. apply has run before.
    ///
    /// Only presence is checked; any stat failure counts as not paved.
    pub fn is_paved(&self) -> Result<bool> {
        let vars_dir = self.vars_dir()?;
        Ok(self.fs.stat(&vars_dir.join(STATE_FILE)).is_ok())
    }
}

fn push_credentials(args: &mut Vec<String>, credentials: &Credentials) {
    for (name, value) in credentials {
        args.push("-var".to_string());
        args.push(format!("{name}={value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryFs, ScriptedRunner, StaticLocator};
    use crate::error::{ErrorCategory, REDACTED_MESSAGE};
    use crate::types::VarValue;

    const TF_DIR: &str = "/state/terraform";
    const VARS_DIR: &str = "/state/vars";

    fn fs() -> MemoryFs {
        MemoryFs::new().with_dir(TF_DIR).with_dir(VARS_DIR)
    }

    fn executor(runner: &ScriptedRunner, fs: &MemoryFs, debug: bool) -> Executor {
        Executor::new(
            Box::new(runner.clone()),
            Box::new(StaticLocator::new(TF_DIR, VARS_DIR)),
            Box::new(fs.clone()),
            debug,
        )
    }

    fn sample_vars() -> Variables {
        let mut vars = Variables::new();
        vars.insert("env_id".to_string(), VarValue::from("lake"));
        vars.insert("zones".to_string(), VarValue::from(vec!["a", "b"]));
        vars.insert("cert".to_string(), VarValue::from("line1\nline2"));
        vars.insert("count".to_string(), VarValue::raw(2));
        vars
    }

    fn credentials() -> Credentials {
        [
            ("access_key".to_string(), "AKIA123".to_string()),
            ("secret_key".to_string(), "s3cr3t".to_string()),
        ]
        .into()
    }

    fn count(args: &[String], flag: &str) -> usize {
        args.iter().filter(|a| *a == flag).count()
    }

    // -------------------------------------------------------------------------
    // setup
    // -------------------------------------------------------------------------

    #[test]
    fn test_setup_writes_layout() {
        let fs = fs();
        let runner = ScriptedRunner::new();
        executor(&runner, &fs, false)
            .setup("resource \"x\" \"y\" {}", &sample_vars())
            .unwrap();

        assert_eq!(
            fs.read_string("/state/terraform/paver-template.tf").unwrap(),
            "resource \"x\" \"y\" {}"
        );
        assert!(fs.is_dir("/state/terraform/.terraform"));
        assert_eq!(
            fs.read_string("/state/terraform/.terraform/.gitignore").unwrap(),
            "*\n"
        );

        let tfvars = fs.read_string("/state/vars/paver.tfvars").unwrap();
        assert!(tfvars.contains("env_id=\"lake\""));
        assert!(tfvars.contains(r#"zones=["a","b"]"#));
        assert!(tfvars.contains(r#"cert="line1\nline2""#));
        assert!(tfvars.contains("count=2"));
        assert_eq!(fs.mode("/state/vars/paver.tfvars"), Some(FILE_MODE));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_setup_is_idempotent() {
        let fs = fs();
        let runner = ScriptedRunner::new();
        let exec = executor(&runner, &fs, false);

        exec.setup("template", &sample_vars()).unwrap();
        let first: Vec<_> = fs.files().into_iter().map(|p| fs.read(&p)).collect();

        exec.setup("template", &sample_vars()).unwrap();
        let second: Vec<_> = fs.files().into_iter().map(|p| fs.read(&p)).collect();

        assert_eq!(first, second);
        assert_eq!(fs.files().len(), 3);
    }

    #[test]
    fn test_setup_reports_failed_step() {
        let fs = fs().fail_on("/state/terraform/.terraform");
        let runner = ScriptedRunner::new();
        let err = executor(&runner, &fs, false)
            .setup("template", &Variables::new())
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().starts_with("create .terraform directory"));
        // The template write happened before the failure and is kept.
        assert!(fs.read("/state/terraform/paver-template.tf").is_some());
        assert!(fs.read("/state/vars/paver.tfvars").is_none());
    }

    #[test]
    fn test_setup_gitignore_write_failure() {
        let fs = fs().fail_on("/state/terraform/.terraform/.gitignore");
        let runner = ScriptedRunner::new();
        let err = executor(&runner, &fs, false)
            .setup("template", &sample_vars())
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(
            err.to_string()
                .starts_with("write .gitignore for terraform binaries")
        );
        assert!(fs.is_dir("/state/terraform/.terraform"));
        assert!(fs.read("/state/vars/paver.tfvars").is_none());
    }

    #[test]
    fn test_setup_vars_write_failure() {
        let fs = fs().fail_on("/state/vars/paver.tfvars");
        let runner = ScriptedRunner::new();
        let err = executor(&runner, &fs, false)
            .setup("template", &sample_vars())
            .unwrap_err();
        assert!(err.to_string().starts_with("write terraform vars"));
    }

    #[test]
    fn test_setup_lookup_failure() {
        let fs = fs();
        let exec = Executor::new(
            Box::new(ScriptedRunner::new()),
            Box::new(StaticLocator::new(TF_DIR, VARS_DIR).without_working_dir()),
            Box::new(fs.clone()),
            false,
        );
        let err = exec.setup("template", &sample_vars()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.to_string().starts_with("get terraform dir"));
        assert!(fs.files().is_empty());
    }

    // -------------------------------------------------------------------------
    // init
    // -------------------------------------------------------------------------

    #[test]
    fn test_init_args() {
        let runner = ScriptedRunner::new();
        executor(&runner, &fs(), true).init().unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["init", TF_DIR]);
        assert!(calls[0].debug);
    }

    #[test]
    fn test_init_failure_is_not_redacted() {
        let runner = ScriptedRunner::new().fail("init", "Failed to query provider");
        let err = executor(&runner, &fs(), false).init().unwrap_err();

        assert!(!err.is_redacted());
        assert_eq!(
            err.to_string(),
            "run terraform init: terraform init failed: Failed to query provider"
        );
    }

    // -------------------------------------------------------------------------
    // apply / destroy
    // -------------------------------------------------------------------------

    #[test]
    fn test_apply_args() {
        let fs = fs().with_file("/state/vars/paver.tfvars", "x=1");
        let runner = ScriptedRunner::new();
        executor(&runner, &fs, false).apply(&credentials()).unwrap();

        let invocations = runner.invocations();
        let args = &invocations[0];
        assert_eq!(
            args,
            &vec![
                "apply",
                "--auto-approve",
                "-var",
                "access_key=AKIA123",
                "-var",
                "secret_key=s3cr3t",
                "-state",
                "/state/vars/terraform.tfstate",
                "-var-file",
                "/state/vars/paver.tfvars",
                TF_DIR,
            ]
        );
    }

    #[test]
    fn test_destroy_args() {
        let runner = ScriptedRunner::new();
        executor(&runner, &fs(), false)
            .destroy(&credentials())
            .unwrap();

        let invocations = runner.invocations();
        let args = &invocations[0];
        assert_eq!(args[..2], ["destroy", "-force"]);
        assert_eq!(count(args, "-var"), 2);
        assert!(args.contains(&"secret_key=s3cr3t".to_string()));
        assert_eq!(args.last().map(String::as_str), Some(TF_DIR));
    }

    #[test]
    fn test_only_tfvars_files_are_passed() {
        let fs = fs()
            .with_file("/state/vars/b.tfvars", "")
            .with_file("/state/vars/a.tfvars", "")
            .with_file("/state/vars/notes.txt", "")
            .with_file("/state/vars/terraform.tfstate", "{}");
        let runner = ScriptedRunner::new();
        executor(&runner, &fs, false)
            .apply(&Credentials::new())
            .unwrap();

        let invocations = runner.invocations();
        let args = &invocations[0];
        assert_eq!(count(args, "-var-file"), 2);
        assert_eq!(count(args, "/state/vars/a.tfvars"), 1);
        assert_eq!(count(args, "/state/vars/b.tfvars"), 1);
        assert!(!args.iter().any(|a| a.ends_with("notes.txt")));
    }

    #[test]
    fn test_var_files_are_sorted() {
        let fs = fs()
            .with_file("/state/vars/z.tfvars", "")
            .with_file("/state/vars/m.tfvars", "")
            .with_file("/state/vars/a.tfvars", "");
        let runner = ScriptedRunner::new();
        executor(&runner, &fs, false)
            .apply(&Credentials::new())
            .unwrap();

        let invocations = runner.invocations();
        let files: Vec<&String> = invocations[0]
            .iter()
            .filter(|a| a.ends_with(".tfvars"))
            .collect();
        assert_eq!(
            files,
            vec![
                "/state/vars/a.tfvars",
                "/state/vars/m.tfvars",
                "/state/vars/z.tfvars"
            ]
        );
    }

    #[test]
    fn test_tfvars_directory_is_skipped() {
        let fs = fs().with_dir("/state/vars/old.tfvars");
        let runner = ScriptedRunner::new();
        executor(&runner, &fs, false)
            .apply(&Credentials::new())
            .unwrap();
        let invocations = runner.invocations();
        assert_eq!(count(&invocations[0], "-var-file"), 0);
    }

    #[test]
    fn test_apply_failure_redacted() {
        let runner = ScriptedRunner::new().fail("apply", "invalid key s3cr3t");
        let err = executor(&runner, &fs(), false)
            .apply(&credentials())
            .unwrap_err();

        assert!(err.is_redacted());
        assert_eq!(err.category(), ErrorCategory::Redacted);
        assert_eq!(err.to_string(), REDACTED_MESSAGE);
        assert!(!err.to_string().contains("invalid key s3cr3t"));
    }

    #[test]
    fn test_apply_failure_debug_unmodified() {
        let runner = ScriptedRunner::new().fail("apply", "invalid key s3cr3t");
        let err = executor(&runner, &fs(), true)
            .apply(&credentials())
            .unwrap_err();

        assert!(!err.is_redacted());
        assert_eq!(
            err.to_string(),
            "terraform apply failed: invalid key s3cr3t"
        );
    }

    #[test]
    fn test_destroy_failure_redacted() {
        let runner = ScriptedRunner::new().fail("destroy", "resource in use");
        let err = executor(&runner, &fs(), false)
            .destroy(&credentials())
            .unwrap_err();
        assert!(err.is_redacted());
        assert!(!err.to_string().contains("resource in use"));
    }

    #[test]
    fn test_apply_debug_flag_forwarded() {
        let runner = ScriptedRunner::new();
        executor(&runner, &fs(), false)
            .apply(&Credentials::new())
            .unwrap();
        executor(&runner, &fs(), true)
            .apply(&Credentials::new())
            .unwrap();

        let calls = runner.calls();
        assert!(!calls[0].debug);
        assert!(calls[1].debug);
    }

    #[test]
    fn test_apply_diagnostics_surface_only_in_debug() {
        let runner = ScriptedRunner::new().stderr("apply", "Warning: deprecated attribute\n");
        executor(&runner, &fs(), false)
            .apply(&Credentials::new())
            .unwrap();
        assert!(runner.echoed().is_empty());

        executor(&runner, &fs(), true)
            .apply(&Credentials::new())
            .unwrap();
        assert_eq!(runner.echoed(), "Warning: deprecated attribute\n");
    }

    #[test]
    fn test_apply_unreadable_vars_dir() {
        let fs = MemoryFs::new().with_dir(TF_DIR);
        let runner = ScriptedRunner::new();
        let err = executor(&runner, &fs, false)
            .apply(&credentials())
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().starts_with("read contents of vars directory"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_apply_vars_lookup_failure_not_redacted() {
        let exec = Executor::new(
            Box::new(ScriptedRunner::new()),
            Box::new(StaticLocator::new(TF_DIR, VARS_DIR).without_vars_dir()),
            Box::new(fs()),
            false,
        );
        let err = exec.apply(&credentials()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.to_string().starts_with("get vars dir"));
    }

    // -------------------------------------------------------------------------
    // output / outputs
    // -------------------------------------------------------------------------

    #[test]
    fn test_output() {
        let runner = ScriptedRunner::new().respond("output", "10.0.0.5\n");
        let value = executor(&runner, &fs(), false).output("jumpbox_ip").unwrap();
        assert_eq!(value, "10.0.0.5");

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["init", TF_DIR]);
        assert!(!calls[0].debug);
        assert_eq!(
            calls[1].args,
            vec![
                "output",
                "jumpbox_ip",
                "-state",
                "/state/vars/terraform.tfstate",
                TF_DIR
            ]
        );
        assert!(calls[1].debug);
    }

    #[test]
    fn test_output_init_failure() {
        let runner = ScriptedRunner::new().fail("init", "no network");
        let err = executor(&runner, &fs(), false).output("x").unwrap_err();
        assert!(err.to_string().starts_with("run terraform init in terraform dir"));
        assert!(err.to_string().contains("no network"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_output_failure_not_redacted() {
        let runner =
            ScriptedRunner::new().fail("output", "The output variable requested could not be found");
        let err = executor(&runner, &fs(), false).output("missing").unwrap_err();
        assert!(!err.is_redacted());
        assert!(err.to_string().contains("could not be found"));
    }

    #[test]
    fn test_outputs() {
        let runner = ScriptedRunner::new().respond(
            "output",
            r#"{"foo":{"sensitive":false,"type":"string","value":"bar"}}"#,
        );
        let outputs = executor(&runner, &fs(), true).outputs().unwrap();

        let expected: Outputs = [("foo".to_string(), VarValue::from("bar"))].into();
        assert_eq!(outputs, expected);

        let calls = runner.calls();
        assert_eq!(calls[0].args, vec!["init", VARS_DIR]);
        assert!(!calls[0].debug);
        assert_eq!(
            calls[1].args,
            vec!["output", "--json", "-state", "/state/vars/terraform.tfstate"]
        );
    }

    #[test]
    fn test_outputs_decode_error() {
        let runner = ScriptedRunner::new().respond("output", "not json");
        let err = executor(&runner, &fs(), false).outputs().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }

    #[test]
    fn test_outputs_silent_runner_is_decode_error() {
        let runner = ScriptedRunner::new();
        let err = executor(&runner, &fs(), false).outputs().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_outputs_subprocess_error() {
        let runner = ScriptedRunner::new().fail("output", "state locked");
        let err = executor(&runner, &fs(), false).outputs().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Command);
        assert!(
            err.to_string()
                .starts_with("run terraform output --json in vars dir")
        );
    }

    // -------------------------------------------------------------------------
    // version / is_paved
    // -------------------------------------------------------------------------

    #[test]
    fn test_version() {
        let runner = ScriptedRunner::new().respond("version", "Terraform v0.12.3\n\nsome notice\n");
        let version = executor(&runner, &fs(), false).version().unwrap();
        assert_eq!(version, "0.12.3");
        assert!(runner.calls()[0].debug);
    }

    #[test]
    fn test_version_ignores_diagnostic_stream() {
        let runner = ScriptedRunner::new()
            .respond("version", "Terraform v1.5.7\non linux_amd64\n")
            .stderr("version", "Warning: upgrade to v1.9.0 available\n");
        let version = executor(&runner, &fs(), false).version().unwrap();
        assert_eq!(version, "1.5.7");
        assert!(runner.echoed().contains("v1.9.0"));
    }

    #[test]
    fn test_version_unparseable() {
        let runner = ScriptedRunner::new().respond("version", "Terraform development build\n");
        let err = executor(&runner, &fs(), false).version().unwrap_err();
        assert!(matches!(err, Error::VersionNotFound));
    }

    #[test]
    fn test_version_subprocess_failure() {
        let runner = ScriptedRunner::new().fail("version", "not found");
        let err = executor(&runner, &fs(), false).version().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Command);
    }

    #[test]
    fn test_is_paved() {
        let fs = fs();
        let runner = ScriptedRunner::new();
        let exec = executor(&runner, &fs, false);
        assert!(!exec.is_paved().unwrap());

        let fs = fs.with_file("/state/vars/terraform.tfstate", "garbage");
        let exec = executor(&runner, &fs, false);
        assert!(exec.is_paved().unwrap());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_is_paved_missing_vars_dir() {
        let fs = MemoryFs::new();
        let exec = executor(&ScriptedRunner::new(), &fs, false);
        assert!(!exec.is_paved().unwrap());
    }
}
