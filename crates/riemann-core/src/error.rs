use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RiemannError {
    #[error("unsupported formula: {0}")]
    UnsupportedFormula(i64),

    #[error("unsupported sampling rule: {0}")]
    UnsupportedRule(String),

    #[error("invalid {field} input: {input:?}")]
    InvalidEditInput { field: String, input: String },
}

pub type RiemannResult<T> = Result<T, RiemannError>;
