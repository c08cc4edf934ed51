//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/pingd.toml";

/// Environment variable consulted when no secret key is configured.
pub const SECRET_KEY_ENV: &str = "PINGD_SECRET_KEY";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Load `path` if given, otherwise the first existing default location.
    ///
    /// An explicit path must exist. With no file anywhere the built-in
    /// defaults are used. A missing secret key is then taken from
    /// `PINGD_SECRET_KEY`.
    pub fn discover(path: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
        let found = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_locations().into_iter().find(|p| p.exists()),
        };

        let mut config = match &found {
            Some(path) => Self::load(path)?,
            None => Config::default(),
        };

        if config.security.secret_key.is_none() {
            config.security.secret_key = std::env::var(SECRET_KEY_ENV).ok();
        }

        Ok((config, found))
    }

    /// Candidate config files, in lookup order.
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join("pingd").join("pingd.toml"));
        }
        locations
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_paths(config: &mut Config) {
        config.store.path = PathBuf::from(Self::expand_path(&config.store.path.to_string_lossy()));
        if let Some(dir) = &config.logging.dir {
            config.logging.dir = Some(PathBuf::from(Self::expand_path(&dir.to_string_lossy())));
        }
    }

    /// Expand shell-style paths (e.g., `~/.pingd`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
