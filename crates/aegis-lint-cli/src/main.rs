//! aegis-lint CLI tool.
//!
//! Usage:
//! ```bash
//! aegis-lint <layering|naming|isr-safety|traceability|globals|all> [OPTIONS] <ROOT>
//! aegis-lint list-rules
//! aegis-lint init
//! ```

use aegis_lint_rules::Checker;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Architecture conformance checker for layered embedded C codebases
#[derive(Parser)]
#[command(name = "aegis-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check include edges against the layer graph
    Layering(CheckArgs),
    /// Check layer naming prefixes
    Naming(CheckArgs),
    /// Check that ISRs never call ISR-unsafe functions
    IsrSafety(CheckArgs),
    /// Check @req / @design / @asil tags
    Traceability(CheckArgs),
    /// Check for mutable global variables
    Globals(CheckArgs),
    /// Run every checker
    All(CheckArgs),

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Options shared by every checker.
#[derive(Args)]
pub struct CheckArgs {
    /// Root directory of the C codebase
    pub root: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Number of worker threads (default: one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report with error and warning blocks.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
    /// Source snippets with labels.
    Rich,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors go to stdout like the rest of the report.
            print!("{err}");
            std::process::exit(i32::from(err.use_stderr()));
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (checker, args) = match cli.command {
        Commands::Layering(args) => (Checker::Layering, args),
        Commands::Naming(args) => (Checker::Naming, args),
        Commands::IsrSafety(args) => (Checker::IsrSafety, args),
        Commands::Traceability(args) => (Checker::Traceability, args),
        Commands::Globals(args) => (Checker::Globals, args),
        Commands::All(args) => (Checker::All, args),
        Commands::ListRules => {
            commands::list_rules::run();
            return Ok(());
        }
        Commands::Init { force } => return commands::init::run(force),
    };

    let source = config_resolver::resolve(&args.root, cli.config.as_deref());
    commands::check::run(checker, &args, &source)
}
