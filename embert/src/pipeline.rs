//! Shared compile-and-run plumbing used by both the `run` and `repl`
//! subcommands (spec §1: "given source text, obtain a compiled artifact,
//! run it, and inspect the last popped stack element").

use emberc_ast::Program;
use emberc_parse::Parser;
use emberc_util::Handler;

use crate::error::{EmbertError, Result};

/// Lexes and parses `source`, joining any accumulated diagnostics into a
/// single [`EmbertError::Parse`] (spec §7: "the parser collects and
/// reports multiple").
pub fn parse(source: &str) -> Result<Program> {
    let mut handler = Handler::new();
    let program = Parser::new(source, &mut handler).parse_program();
    if handler.has_errors() {
        let messages: Vec<String> = handler.diagnostics().iter().map(|d| d.to_string()).collect();
        return Err(EmbertError::Parse(messages.join("; ")));
    }
    Ok(program)
}
