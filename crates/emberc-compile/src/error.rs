use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}

pub type CompileResult<T> = Result<T, CompileError>;
