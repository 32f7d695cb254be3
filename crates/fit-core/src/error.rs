use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("no selection available: {0}")]
    MissingSelection(String),
    #[error("correspondence mismatch: {0}")]
    CorrespondenceMismatch(String),
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

pub type FitResult<T> = Result<T, FitError>;
