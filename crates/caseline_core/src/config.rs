//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve logging settings from `CASELINE_LOG_LEVEL` / `CASELINE_LOG_DIR`.
//!
//! # Invariants
//! - Unset variables fall back to defaults; set-but-invalid ones are errors.
//! - Resolving configuration has no side effects; `init_logging` applies it.

use crate::logging::{self, default_log_level, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "CASELINE_LOG_LEVEL";
/// Environment variable holding the absolute log directory.
pub const ENV_LOG_DIR: &str = "CASELINE_LOG_DIR";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Normalised level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// File logging is off when `None`.
    pub log_dir: Option<PathBuf>,
}

/// Configuration resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidVariable {
        name: &'static str,
        source: LoggingError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidVariable { name, source } => write!(f, "{name}: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidVariable { source, .. } => Some(source),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config = config.with_log_level(&level).map_err(|source| {
                ConfigError::InvalidVariable {
                    name: ENV_LOG_LEVEL,
                    source,
                }
            })?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config = config
                .with_log_dir(PathBuf::from(dir.trim()))
                .map_err(|source| ConfigError::InvalidVariable {
                    name: ENV_LOG_DIR,
                    source,
                })?;
        }
        Ok(config)
    }

    /// Overrides the level, e.g. from a command-line flag.
    pub fn with_log_level(mut self, level: &str) -> Result<Self, LoggingError> {
        self.log_level = logging::normalize_level(level)?;
        Ok(self)
    }

    /// Overrides the directory, e.g. from a command-line flag.
    pub fn with_log_dir(mut self, dir: PathBuf) -> Result<Self, LoggingError> {
        self.log_dir = Some(logging::normalize_log_dir(&dir)?);
        Ok(self)
    }

    /// Starts file logging when a directory is configured.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.log_dir {
            Some(dir) => logging::init_logging(self.log_level, dir),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::{default_log_level, LoggingError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = CoreConfig::from_lookup(lookup(&[])).expect("empty env");
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn reads_level_and_directory() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, " /var/log/caseline "),
        ]))
        .expect("valid env");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/caseline")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "  "), (ENV_LOG_DIR, "")]))
            .expect("blank env");
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn names_the_offending_variable() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")]))
            .expect_err("unknown level");
        assert_eq!(
            err,
            ConfigError::InvalidVariable {
                name: ENV_LOG_LEVEL,
                source: LoggingError::UnsupportedLevel("loud".to_string()),
            }
        );

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "relative/logs")]))
            .expect_err("relative dir");
        assert!(err.to_string().starts_with(ENV_LOG_DIR));
    }

    #[test]
    fn init_without_directory_is_a_no_op() {
        CoreConfig::default()
            .init_logging()
            .expect("no directory means nothing to start");
    }
}
