//! Subcommand implementations for the `embert` CLI.

pub mod repl;
pub mod run;

pub use repl::{run_repl, ReplArgs};
pub use run::{run_run, RunArgs};
