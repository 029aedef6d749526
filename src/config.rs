//! Service configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [auth]
//! token_secret = "at-least-sixteen-bytes"
//! token_ttl_hours = 168
//! password_iterations = 100000
//!
//! [seed]
//! demo_users = false
//! ```
//!
//! or from `HOSTEL_TOKEN_SECRET`, `HOSTEL_TOKEN_TTL_HOURS`,
//! `HOSTEL_PASSWORD_ITERATIONS` and `HOSTEL_SEED_DEMO_USERS`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::password::DEFAULT_ITERATIONS;
use crate::secret::Secret;
use crate::token::DEFAULT_TTL_HOURS;

/// Shortest accepted signing key, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Credential settings
    pub auth: AuthConfig,
    /// Demo data settings
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Credential settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC key for bearer tokens
    pub token_secret: Secret<String>,
    /// Token lifetime in hours
    #[serde(default = "default_ttl_hours")]
    pub token_ttl_hours: i64,
    /// PBKDF2 iteration count for new password hashes
    #[serde(default = "default_iterations")]
    pub password_iterations: u32,
}

/// Demo data settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Allow creating the three demo accounts
    #[serde(default)]
    pub demo_users: bool,
}

fn default_ttl_hours() -> i64 {
    DEFAULT_TTL_HOURS
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl Config {
    /// Builds a config around `token_secret` with every other value defaulted.
    pub fn with_secret(token_secret: impl Into<String>) -> Result<Self, ConfigError> {
        Self {
            auth: AuthConfig {
                token_secret: Secret::new(token_secret.into()),
                token_ttl_hours: DEFAULT_TTL_HOURS,
                password_iterations: DEFAULT_ITERATIONS,
            },
            seed: SeedConfig::default(),
        }
        .validated()
    }

    /// Reads and validates a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validated()
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token_secret = lookup("HOSTEL_TOKEN_SECRET").ok_or_else(|| ConfigError::Invalid {
            message: "HOSTEL_TOKEN_SECRET is not set".into(),
        })?;
        let token_ttl_hours = parse_var(&lookup, "HOSTEL_TOKEN_TTL_HOURS", DEFAULT_TTL_HOURS)?;
        let password_iterations =
            parse_var(&lookup, "HOSTEL_PASSWORD_ITERATIONS", DEFAULT_ITERATIONS)?;
        let demo_users = parse_var(&lookup, "HOSTEL_SEED_DEMO_USERS", false)?;

        Self {
            auth: AuthConfig {
                token_secret: Secret::new(token_secret),
                token_ttl_hours,
                password_iterations,
            },
            seed: SeedConfig { demo_users },
        }
        .validated()
    }

    /// Enables or disables demo seeding.
    pub fn seed_demo_users(mut self, enabled: bool) -> Self {
        self.seed.demo_users = enabled;
        self
    }

    /// Overrides the PBKDF2 iteration count (at least 1).
    pub fn password_iterations(mut self, iterations: u32) -> Self {
        self.auth.password_iterations = iterations.max(1);
        self
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.auth.token_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                message: format!("token_secret must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                message: "token_ttl_hours must be positive".into(),
            });
        }
        if self.auth.password_iterations == 0 {
            return Err(ConfigError::Invalid {
                message: "password_iterations must be positive".into(),
            });
        }
        Ok(self)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            message: format!("{key} has an invalid value"),
        }),
    }
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The TOML was malformed or had unknown keys.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// A value was missing or out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What was wrong
        message: String,
    },
}
