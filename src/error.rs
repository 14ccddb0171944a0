//! Compliance engine error types.

use thiserror::Error;

/// Errors that can abort a compliance analysis.
///
/// Degenerate inputs (empty stream, empty plan, unmatched segments) are not
/// errors; they produce a well-formed analysis with a zero score.
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// Athlete parameters or analyzer settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compliance operations.
pub type ComplianceResult<T> = Result<T, ComplianceError>;

impl ComplianceError {
    /// Shorthand for an FTP that is not a positive, finite number of watts.
    pub fn invalid_ftp(ftp: f64) -> Self {
        ComplianceError::InvalidConfiguration(format!("FTP must be greater than 0, got {}", ftp))
    }
}
