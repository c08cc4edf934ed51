//! Scheduler errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("No scheduled job with tag: {0}")]
    TagNotFound(String),

    #[error("Scheduler is stopped")]
    Stopped,

    #[error("Scheduler error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cron_error() {
        let err = SchedulerError::InvalidCronExpression {
            expression: "* * * rv *".to_string(),
            reason: "unexpected token".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("* * * rv *"));
        assert!(display.contains("unexpected token"));
    }

    #[test]
    fn test_tag_not_found_error() {
        let err = SchedulerError::TagNotFound("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_error_debug() {
        let err = SchedulerError::Stopped;
        let debug = format!("{:?}", err);
        assert!(debug.contains("Stopped"));
    }
}
