use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VmError {
    #[error("unsupported types for binary operation: {0} {1}")]
    UnsupportedBinaryOperation(&'static str, &'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unsupported type for negation: {0}")]
    UnsupportedNegation(&'static str),

    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),

    #[error("calling non-function and non-closure")]
    NotCallable,

    #[error("wrong number of arguments: want {want} got {got}")]
    WrongArgumentCount { want: usize, got: usize },

    #[error("stack overflow")]
    StackOverflow,

    #[error("call stack exceeded")]
    CallStackExceeded,
}

pub type VmResult<T> = Result<T, VmError>;
