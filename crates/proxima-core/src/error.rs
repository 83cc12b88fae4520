//! Error types for Proxima

use thiserror::Error;

/// Result type alias for Proxima operations
pub type Result<T> = std::result::Result<T, ProximaError>;

/// Main error type for Proxima
///
/// Every variant is caller-facing input validation; none is recoverable by
/// retrying the same call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProximaError {
    /// Vector dimension mismatch
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Empty vector identifier
    #[error("vector id cannot be empty")]
    EmptyId,

    /// Vector not found
    #[error("vector not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProximaError::DimensionMismatch {
            expected: 128,
            actual: 64,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 128, got 64");

        let err = ProximaError::NotFound("vec-7".to_string());
        assert_eq!(err.to_string(), "vector not found: vec-7");
    }
}
