//! embert — CLI driver for the Ember toolchain.
//!
//! An ambient "external collaborator" in the sense of spec §1: it owns no
//! opcode, no AST node, no VM semantics. It only wires the lexer, parser,
//! compiler, and VM together behind two subcommands: `run <path>` compiles
//! a file and executes it once; `repl` does the same line-by-line, reusing
//! compiler and VM state across lines (SPEC_FULL §4).

mod commands;
mod config;
mod error;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_repl, run_run, ReplArgs, RunArgs};
use config::Config;

/// Embert — run or explore Ember programs.
#[derive(Parser, Debug)]
#[command(name = "embert")]
#[command(author = "Ember Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile and run Ember source", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose tracing output.
    #[arg(short, long, global = true, env = "EMBERT_VERBOSE")]
    verbose: bool,

    /// Path to an `embert.toml` configuration file.
    #[arg(short, long, global = true, env = "EMBERT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile and run a single Ember source file.
    Run(RunCommand),

    /// Start an interactive REPL over stdin.
    Repl,
}

#[derive(Parser, Debug)]
struct RunCommand {
    /// Path to the Ember source file to run.
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Run(args) => run_run(RunArgs { path: args.path, verbose: cli.verbose }, config),
        Commands::Repl => run_repl(ReplArgs { verbose: cli.verbose }, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn load_config(path: Option<&std::path::Path>) -> error::Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}
