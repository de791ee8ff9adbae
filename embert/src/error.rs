//! Error handling for the `embert` driver.
//!
//! Mirrors `faxt::error`: a `thiserror`-derived enum for driver-local
//! failures. The lower crates' typed errors (`CompileError`, `VmError`)
//! are wrapped rather than re-derived, since they already carry the
//! spec §7 taxonomy; lex/parse diagnostics are accumulated on a
//! `emberc_util::Handler` and rendered as a single `Parse` variant.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbertError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("compile error: {0}")]
    Compile(#[from] emberc_compile::CompileError),

    #[error("runtime error: {0}")]
    Runtime(#[from] emberc_vm::VmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EmbertError>;
