//! Error types for the underwriting engine

use thiserror::Error;

/// Errors surfaced by the calculation and report pipeline.
///
/// A failed IRR search is not an error: the solver reports an
/// undetermined outcome as `None` and the report renders a blank.
#[derive(Debug, Error)]
pub enum UnderwritingError {
    /// Invalid or impossible input, raised immediately rather than
    /// defaulted away
    #[error("invalid input for {field}: {reason}")]
    Domain { field: &'static str, reason: String },

    /// Report buffer encoding failure
    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl UnderwritingError {
    pub fn domain(field: &'static str, reason: impl Into<String>) -> Self {
        UnderwritingError::Domain {
            field,
            reason: reason.into(),
        }
    }
}
