use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use dependency_versions_check::application::dto::{OutputFormat, VALID_SCOPES};

/// Detect dependency version conflicts in resolved Maven dependency graphs
#[derive(Parser, Debug)]
#[command(name = "dvc")]
#[command(version)]
#[command(
    about = "Detect dependency version conflicts in resolved Maven dependency graphs",
    long_about = None
)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format: text or json [default: text]
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Disable colored text output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report version conflicts and decide whether they fail the build
    Check(CheckArgs),
    /// List the resolved version of every dependency
    List(ListArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Check(args) => &args.common,
            Command::List(args) => &args.common,
        }
    }
}

/// Options shared by `check` and `list`
#[derive(ClapArgs, Debug)]
pub struct CommonArgs {
    /// Dependency graph snapshot exported by the build
    #[arg(short, long, value_name = "FILE")]
    pub graph: PathBuf,

    /// Configuration file (defaults to dvc.config.yml next to the graph or in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scope to check: compile, runtime, test or compile+runtime [default: test]
    #[arg(short, long, value_parser = parse_scope)]
    pub scope: Option<String>,

    /// Resolve the graph of every dependency, not only the direct ones
    #[arg(long)]
    pub deep_scan: bool,

    /// Only report direct dependencies
    #[arg(long)]
    pub direct_only: bool,

    /// Only report dependencies with a managed version
    #[arg(long)]
    pub managed_only: bool,

    /// Resolve dependency graphs one after another
    #[arg(long)]
    pub sequential: bool,

    /// Also check projects with pom packaging
    #[arg(long)]
    pub include_pom_projects: bool,

    /// Skip the check
    #[arg(long)]
    pub skip: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report dependencies without conflicts too
    #[arg(long)]
    pub all: bool,

    /// Fail if any version conflict is found
    #[arg(long)]
    pub fail_on_conflict: bool,

    /// Fail if a direct dependency has a version conflict
    #[arg(long)]
    pub fail_on_direct_conflict: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only list dependencies with version conflicts
    #[arg(long)]
    pub conflicts_only: bool,
}

fn parse_scope(scope: &str) -> Result<String, String> {
    if VALID_SCOPES.contains(&scope) {
        Ok(scope.to_string())
    } else {
        Err(format!(
            "Scope '{}' is invalid. Valid scopes: {}",
            scope,
            VALID_SCOPES.join(", ")
        ))
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
