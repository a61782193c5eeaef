//! Commands that change the environment: setup, init, apply, destroy.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use terrakit::{Executor, VarValue, Variables};

use crate::Context as AppContext;
use crate::cli::{CredentialArgs, DestroyArgs, SetupArgs};
use crate::commands::{credentials, executor};
use crate::ui;

pub fn setup(ctx: &AppContext, args: SetupArgs) -> Result<()> {
    let template = fs::read_to_string(&args.template)
        .with_context(|| format!("Could not read template {}", args.template.display()))?;
    let vars = load_variables(args.vars.as_deref(), &args.var)?;

    stage(&executor(ctx), &template, &vars)?;

    if !ctx.quiet {
        ui::success(&format!(
            "Staged {} with {}",
            args.template.display(),
            ui::count(vars.len(), "variable")
        ));
    }
    Ok(())
}

pub fn init(ctx: &AppContext) -> Result<()> {
    executor(ctx).init()?;
    if !ctx.quiet {
        ui::success("Terraform initialized");
    }
    Ok(())
}

pub fn apply(ctx: &AppContext, args: CredentialArgs) -> Result<()> {
    let executor = executor(ctx);
    if !ctx.quiet {
        ui::info("Applying terraform template...");
    }
    executor.apply(&credentials(&args.var))?;
    if !ctx.quiet {
        ui::success("Environment paved");
    }
    Ok(())
}

pub fn destroy(ctx: &AppContext, args: DestroyArgs) -> Result<()> {
    let executor = executor(ctx);

    if !args.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Destroy the environment in {}?",
                ctx.settings.state_dir.display()
            ))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;

        if !confirmed {
            ui::warn("Destroy cancelled");
            return Ok(());
        }
    }

    if !ctx.quiet {
        ui::info("Destroying terraform resources...");
    }
    executor.destroy(&credentials(&args.credentials.var))?;
    if !ctx.quiet {
        ui::success("Environment destroyed");
    }
    Ok(())
}

/// Write the template and variables through the executor.
fn stage(executor: &Executor, template: &str, vars: &Variables) -> Result<()> {
    executor
        .setup(template, vars)
        .context("Failed to stage terraform files")
}

/// Build a variable set from an optional JSON object file plus `--var`
/// overrides.
///
/// JSON strings become string variables, arrays of strings become lists and
/// any other value is passed to terraform as its JSON text.
pub fn load_variables(file: Option<&Path>, overrides: &[(String, String)]) -> Result<Variables> {
    let mut vars = Variables::new();

    if let Some(path) = file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;

        let serde_json::Value::Object(map) = value else {
            bail!("{} must contain a JSON object", path.display());
        };
        vars.extend(map.into_iter().map(|(k, v)| (k, VarValue::from(v))));
    }

    for (name, value) in overrides {
        vars.insert(name.clone(), VarValue::from(value.as_str()));
    }

    Ok(vars)
}
