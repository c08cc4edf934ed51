//! # pingd Config
//!
//! TOML configuration for the pingd daemon: schema with defaults, a loader
//! with `${VAR}` and `~` expansion, and a validator that separates fatal
//! errors from warnings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH, SECRET_KEY_ENV};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
