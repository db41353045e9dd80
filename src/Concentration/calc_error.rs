use thiserror::Error;

/// errors of the calculator, the substance catalogue, settings and export
#[derive(Debug, Error)]
pub enum CalcError {
    /// missing, zero, negative or non-finite value where a physical quantity is expected
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown substance: {0}")]
    UnknownSubstance(String),
    #[error("No results to export")]
    NothingToExport,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        CalcError::InvalidInput(reason.into())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
