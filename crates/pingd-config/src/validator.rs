//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, LOG_FORMATS, STORE_BACKENDS};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], if any.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_store(config, &mut result);
        Self::validate_scheduler(config, &mut result);
        Self::validate_probe(config, &mut result);
        Self::validate_security(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_store(config: &Config, result: &mut ValidationResult) {
        let backend = config.store.backend.as_str();
        if !STORE_BACKENDS.contains(&backend) {
            result.add_error(ValidationError::new(
                "store.backend",
                format!(
                    "Unknown store backend '{}', valid values: {:?}",
                    backend, STORE_BACKENDS
                ),
            ));
        }

        if backend == "memory" {
            result.add_warning(ValidationWarning::new(
                "store.backend",
                "Memory backend keeps jobs in process memory; they are lost on restart",
            ));
        }

        if backend == "sqlite" && config.store.path.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "store.path",
                "SQLite backend requires a database path",
            ));
        }

        if config.store.job_set_name.is_empty() {
            result.add_error(ValidationError::new(
                "store.job_set_name",
                "Job set name cannot be empty",
            ));
        }
    }

    fn validate_scheduler(config: &Config, result: &mut ValidationResult) {
        let secs = config.scheduler.reconcile_interval_secs;
        if secs == 0 {
            result.add_error(ValidationError::new(
                "scheduler.reconcile_interval_secs",
                "reconcile_interval_secs must be greater than 0",
            ));
        } else if secs < 2 {
            result.add_warning(ValidationWarning::new(
                "scheduler.reconcile_interval_secs",
                "Reconcile interval is very short (<2s), this reads the whole job index every tick",
            ));
        }
    }

    fn validate_probe(config: &Config, result: &mut ValidationResult) {
        if config.probe.default_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "probe.default_timeout_secs",
                "default_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_security(config: &Config, result: &mut ValidationResult) {
        match config.security.secret_key.as_deref() {
            None | Some("") => result.add_error(ValidationError::new(
                "security.secret_key",
                "Secret key is not set (use [security] secret_key or PINGD_SECRET_KEY)",
            )),
            Some(key) if !is_valid_secret_key(key) => result.add_error(ValidationError::new(
                "security.secret_key",
                format!(
                    "Secret key must be 32 characters or 64 hex digits, got {} characters",
                    key.len()
                ),
            )),
            Some(_) => {}
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let format = config.logging.format.as_str();
        if !LOG_FORMATS.contains(&format) {
            result.add_error(ValidationError::new(
                "logging.format",
                format!("Unknown log format '{}', valid values: {:?}", format, LOG_FORMATS),
            ));
        }

        if config.logging.level.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                "Log level is empty, defaulting to info",
            ));
        }
    }
}

fn is_valid_secret_key(key: &str) -> bool {
    key.len() == 32 || (key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
