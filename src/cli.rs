use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paver")]
#[command(version)]
#[command(about = "Stage, apply and inspect terraform environments", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show unredacted terraform failures and live terraform diagnostics
    #[arg(long, global = true, env = "PAVER_DEBUG")]
    pub debug: bool,

    /// State directory (terraform template, vars and state)
    #[arg(long, global = true, env = "PAVER_STATE_DIR", value_name = "DIR")]
    pub state_dir: Option<String>,

    /// Terraform binary to run
    #[arg(long, global = true, env = "PAVER_TERRAFORM", value_name = "PATH")]
    pub terraform: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stage a template and its variables in the state directory
    Setup(SetupArgs),

    /// Initialize the terraform working directory
    Init,

    /// Create or update the environment
    Apply(CredentialArgs),

    /// Tear the environment down
    Destroy(DestroyArgs),

    /// Print a single output value
    Output {
        /// Output name
        name: String,
    },

    /// Print every output value
    Outputs {
        /// Print a JSON object instead of name: value lines
        #[arg(long)]
        json: bool,
    },

    /// Print the terraform version
    Version,

    /// Report whether the environment has been applied
    IsPaved,

    /// Show the output of the last failed terraform run
    LatestError,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct SetupArgs {
    /// Terraform template file
    #[arg(long, value_name = "FILE")]
    pub template: PathBuf,

    /// JSON file with an object of variable values
    #[arg(long, value_name = "FILE")]
    pub vars: Option<PathBuf>,

    /// Set a string variable (overrides --vars)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub var: Vec<(String, String)>,
}

#[derive(Args)]
pub struct CredentialArgs {
    /// Pass a credential to terraform as -var NAME=VALUE
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub var: Vec<(String, String)>,
}

#[derive(Args)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Parse `name=value`, splitting on the first `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    if name.is_empty() {
        return Err(format!("missing variable name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
