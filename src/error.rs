//! Error types for lease valuation and schedule generation

use thiserror::Error;

/// Errors raised while loading, valuing or scheduling lease contracts
#[derive(Debug, Error)]
pub enum LeaseError {
    /// Missing or malformed input (columns, amounts, dates, rates, frequency)
    #[error("Invalid input: {field} - {reason}")]
    Validation { field: String, reason: String },

    /// Lease term with no months, no payment periods or no payments
    #[error("Degenerate lease term: {0}")]
    DegenerateTerm(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LeaseError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LeaseError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LeaseError::Validation { .. })
    }

    pub fn is_degenerate_term(&self) -> bool {
        matches!(self, LeaseError::DegenerateTerm(_))
    }
}

pub type LeaseResult<T> = Result<T, LeaseError>;

/// A contract that could not be loaded or evaluated
#[derive(Debug)]
pub struct ContractFailure {
    /// 1-based source row (CSV data row when loaded from an upload)
    pub row: usize,

    /// Lease name, when it could be read
    pub lease_name: String,

    pub error: LeaseError,
}

impl std::fmt::Display for ContractFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lease_name.is_empty() {
            write!(f, "row {}: {}", self.row, self.error)
        } else {
            write!(f, "row {} ({}): {}", self.row, self.lease_name, self.error)
        }
    }
}
