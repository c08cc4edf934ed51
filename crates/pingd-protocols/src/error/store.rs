//! Store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether this is the expected "no such key" outcome rather than an
    /// infrastructure failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = StoreError::NotFound("job-123".to_string());
        let display = err.to_string();
        assert!(display.contains("not found"));
        assert!(display.contains("job-123"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unavailable_error() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_backend_error() {
        let err = StoreError::Backend("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
        assert!(!err.is_not_found());
    }
}
