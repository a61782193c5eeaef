mod cli;
mod commands;
mod config;
mod paths;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

use config::{Overrides, PaverConfig, Settings};

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub settings: Settings,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "paver", &mut io::stdout());
        return Ok(());
    }

    let overrides = Overrides {
        terraform: cli.terraform,
        state_dir: cli.state_dir,
        debug: cli.debug,
    };
    let settings = Settings::resolve(&PaverConfig::load()?, &overrides)?;
    log::debug!("Resolved settings: {settings:?}");

    let ctx = Context {
        quiet: cli.quiet,
        settings,
    };

    match cli.command {
        Command::Setup(args) => commands::lifecycle::setup(&ctx, args),
        Command::Init => commands::lifecycle::init(&ctx),
        Command::Apply(args) => commands::lifecycle::apply(&ctx, args),
        Command::Destroy(args) => commands::lifecycle::destroy(&ctx, args),
        Command::Output { name } => commands::query::output(&ctx, &name),
        Command::Outputs { json } => commands::query::outputs(&ctx, json),
        Command::Version => commands::query::version(&ctx),
        Command::IsPaved => commands::query::is_paved(&ctx),
        Command::LatestError => commands::query::latest_error(&ctx),
        Command::Completions { .. } => Ok(()),
    }
}

/// Print an error chain with a category hint for terrakit errors.
fn report(err: &anyhow::Error) {
    let (message, hint) = summarize(err);
    ui::error(&message);
    if let Some(hint) = hint {
        ui::hint(&hint);
    }
}

/// terrakit errors already render their own causes, so the chain stops
/// there and their category is summarized instead.
fn summarize(err: &anyhow::Error) -> (String, Option<String>) {
    let mut parts = Vec::new();
    let mut hint = None;
    for cause in err.chain() {
        parts.push(cause.to_string());
        if let Some(tk) = cause.downcast_ref::<terrakit::Error>() {
            if !tk.is_redacted() {
                let category = tk.category();
                hint = Some(format!("{}. {}", category.description(), category.advice()));
            }
            break;
        }
    }
    (parts.join(": "), hint)
}
