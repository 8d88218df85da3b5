use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::lifecycle::lookup::DEFAULT_ENV_PREFIX;

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Log filter used when `APP_LOG_LEVEL` is not set.
    pub const fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub policy: PolicyConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let document_path = env::var("LIFECYCLE_POLICY_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let env_prefix =
            env::var("LIFECYCLE_ENV_PREFIX").unwrap_or_else(|_| DEFAULT_ENV_PREFIX.to_string());
        if env_prefix.is_empty()
            || !env_prefix
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
        {
            return Err(ConfigError::InvalidEnvPrefix(env_prefix));
        }

        let log_level = env::var("APP_LOG_LEVEL")
            .unwrap_or_else(|_| environment.default_log_level().to_string());

        Ok(Self {
            environment,
            policy: PolicyConfig {
                document_path,
                env_prefix,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where lifecycle policy flags come from.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Optional JSON policy document.
    pub document_path: Option<PathBuf>,
    /// Prefix for environment variables that override the document.
    pub env_prefix: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvPrefix(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvPrefix(prefix) => write!(
                f,
                "LIFECYCLE_ENV_PREFIX must be non-empty upper snake case, found '{}'",
                prefix
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
