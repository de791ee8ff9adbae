//! emberc-lex — lexical analysis for Ember source (spec §4.1).
//!
//! Transforms source text into a stream of [`Token`]s: whitespace is
//! skipped, multi-character operators are recognised with one character of
//! lookahead, string literals are delimited by `"`, and identifier/keyword
//! runs are classified against the reserved-word set. An unrecognised
//! character is reported on the shared [`emberc_util::Handler`] and
//! surfaces as `Token::Illegal` rather than aborting the stream — lexing
//! never panics on input it doesn't understand.

mod cursor;
mod lexer;
mod token;

pub use lexer::{Lexer, TokenWithSpan};
pub use token::Token;
