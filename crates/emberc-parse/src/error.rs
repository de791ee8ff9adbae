use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken { expected: String, found: String },

    #[error("no prefix parse function for {0}")]
    NoPrefixParseFn(String),

    #[error("could not parse {0} as an integer literal")]
    InvalidInteger(String),
}
