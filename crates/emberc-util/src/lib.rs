//! emberc-util — shared foundation types for the Ember toolchain.
//!
//! Every other `emberc-*` crate depends on this one. It has no opinion on
//! lexing, parsing, compiling, or execution; it only provides the plumbing
//! those phases share: interned identifiers ([`Symbol`]), source locations
//! ([`Span`]), and a diagnostic sink ([`Handler`]).

mod span;
mod symbol;

pub use span::Span;
pub use symbol::Symbol;

use std::fmt;

/// Severity of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
}

/// A single diagnostic message produced by the lexer or parser.
///
/// Diagnostics are data, not log lines — the lexer and parser never print
/// anything themselves. A caller (the `embert` driver, or a test) decides
/// how to render the `Handler`'s accumulated diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        };
        write!(f, "{tag}: {} ({})", self.message, self.span)
    }
}

/// Accumulates diagnostics across a phase instead of failing fast.
///
/// Spec-mandated propagation policy: the lexer reports unknown characters
/// as `Token::Invalid` plus a pushed diagnostic; the parser accumulates
/// errors and keeps going where the grammar allows it, reporting all of
/// them once `parse_program` returns.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
