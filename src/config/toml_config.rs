use crate::config::{DEFAULT_AVAILABILITY_BASE_URL, DEFAULT_SERVICES_BASE_URL};
use crate::core::retry::DEFAULT_MAX_ATTEMPTS;
use crate::utils::error::ConfigError;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Configuration for a fare client. Every section and field is optional.
///
/// ```toml
/// [client]
/// currency = "EUR"
/// timeout_seconds = 20
///
/// [retry]
/// max_attempts = 5
/// initial_delay_ms = 1000
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareConfig {
    pub client: ClientSettings,
    pub retry: RetrySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Empty means no `currency` parameter is sent.
    pub currency: String,
    pub services_base_url: String,
    pub availability_base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            currency: String::new(),
            services_base_url: DEFAULT_SERVICES_BASE_URL.to_string(),
            availability_base_url: DEFAULT_AVAILABILITY_BASE_URL.to_string(),
            timeout_seconds: Some(30),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl FareConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with the environment variable's
    /// value. Unset variables are left as written.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let processed = substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    pub fn validate_config(&self) -> Result<(), ConfigError> {
        validation::validate_currency_code("client.currency", &self.client.currency)?;
        validation::validate_url("client.services_base_url", &self.client.services_base_url)?;
        validation::validate_url(
            "client.availability_base_url",
            &self.client.availability_base_url,
        )?;
        if let Some(timeout) = self.client.timeout_seconds {
            validation::validate_range("client.timeout_seconds", timeout, 1, 600)?;
        }

        validation::validate_range("retry.max_attempts", self.retry.max_attempts, 1, 20)?;
        validation::validate_range("retry.multiplier", self.retry.multiplier, 1.0, 10.0)?;
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::InvalidConfigValueError {
                field: "retry.initial_delay_ms".to_string(),
                value: self.retry.initial_delay_ms.to_string(),
                reason: format!(
                    "Initial delay must not exceed retry.max_delay_ms ({})",
                    self.retry.max_delay_ms
                ),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for FareConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_config()
    }
}

fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
