//! Read-only commands: output, outputs, version, is-paved, latest-error.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use terrakit::Outputs;

use crate::Context as AppContext;
use crate::commands::executor;
use crate::state::StateDirs;
use crate::ui;

pub fn output(ctx: &AppContext, name: &str) -> Result<()> {
    let value = executor(ctx)
        .output(name)
        .with_context(|| format!("Failed to read output '{name}'"))?;
    println!("{value}");
    Ok(())
}

pub fn outputs(ctx: &AppContext, json: bool) -> Result<()> {
    let outputs = executor(ctx).outputs()?;
    if outputs.is_empty() && !json {
        if !ctx.quiet {
            ui::info("No outputs recorded");
        }
        return Ok(());
    }
    print!("{}", render_outputs(&outputs, json)?);
    Ok(())
}

pub fn version(ctx: &AppContext) -> Result<()> {
    println!("{}", executor(ctx).version()?);
    Ok(())
}

pub fn is_paved(ctx: &AppContext) -> Result<()> {
    println!("{}", executor(ctx).is_paved()?);
    Ok(())
}

pub fn latest_error(ctx: &AppContext) -> Result<()> {
    let path = StateDirs::new(&ctx.settings.state_dir).latest_error_path();
    match read_latest_error(&path)? {
        Some(log) => print!("{log}"),
        None => ui::info("No failed terraform runs recorded"),
    }
    Ok(())
}

/// `name: value` lines, or a pretty JSON object.
fn render_outputs(outputs: &Outputs, json: bool) -> Result<String> {
    if json {
        let object: serde_json::Map<String, serde_json::Value> = outputs
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        let mut text = serde_json::to_string_pretty(&object)
            .context("Failed to encode outputs as JSON")?;
        text.push('\n');
        return Ok(text);
    }

    Ok(outputs
        .iter()
        .map(|(name, value)| format!("{name}: {value}\n"))
        .collect())
}

fn read_latest_error(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(log) => Ok(Some(log)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Could not read {}", path.display())),
    }
}
