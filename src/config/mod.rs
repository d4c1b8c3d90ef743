//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SIERRA_*` environment variables.
//! Component tuning (scoring constants, escalation policy) lives next to the
//! component and is loaded by its own `from_env`; the shared parsing helpers
//! are here.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::DEFAULT_LLM_MODEL;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIERRA_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Sentence-embedding model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    pub embedding_model_path: Option<PathBuf>,

    /// Fine-tuned question-type classifier directory.
    pub question_classifier_path: Option<PathBuf>,

    /// Fine-tuned interview-stage classifier directory.
    pub stage_classifier_path: Option<PathBuf>,

    /// Model name handed to the LLM fallback classifiers.
    pub llm_model: String,

    /// Answer fallback classifications locally instead of calling the LLM provider.
    pub mock_provider: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            embedding_model_path: None,
            question_classifier_path: None,
            stage_classifier_path: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SIERRA_PORT";
    const ENV_BIND_ADDR: &'static str = "SIERRA_BIND_ADDR";
    const ENV_EMBEDDING_MODEL_PATH: &'static str = "SIERRA_EMBEDDING_MODEL_PATH";
    const ENV_QUESTION_CLASSIFIER_PATH: &'static str = "SIERRA_QUESTION_CLASSIFIER_PATH";
    const ENV_STAGE_CLASSIFIER_PATH: &'static str = "SIERRA_STAGE_CLASSIFIER_PATH";
    const ENV_LLM_MODEL: &'static str = "SIERRA_LLM_MODEL";
    const ENV_MOCK_PROVIDER: &'static str = "SIERRA_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let embedding_model_path = optional_path_from_env(Self::ENV_EMBEDDING_MODEL_PATH);
        let question_classifier_path = optional_path_from_env(Self::ENV_QUESTION_CLASSIFIER_PATH);
        let stage_classifier_path = optional_path_from_env(Self::ENV_STAGE_CLASSIFIER_PATH);
        let llm_model = env::var(Self::ENV_LLM_MODEL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.llm_model);
        let mock_provider = env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty());

        Ok(Self {
            port,
            bind_addr,
            embedding_model_path,
            question_classifier_path,
            stage_classifier_path,
            llm_model,
            mock_provider,
        })
    }

    /// Checks that every configured model directory exists and is a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model_dirs = [
            &self.embedding_model_path,
            &self.question_classifier_path,
            &self.stage_classifier_path,
        ];

        for path in model_dirs.into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.llm_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_LLM_MODEL,
                value: self.llm_model.clone(),
                reason: "model name cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }
}

/// Reads a non-empty, trimmed path from `var_name`.
pub(crate) fn optional_path_from_env(var_name: &str) -> Option<PathBuf> {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Parses `var_name` with [`FromStr`], returning `None` when unset or blank.
pub(crate) fn parse_from_env<T>(var_name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(var_name) else {
        return Ok(None);
    };

    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            name: var_name,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a ratio in `[0.0, 1.0]` from `var_name`, falling back to `default`.
pub(crate) fn unit_interval_from_env(
    var_name: &'static str,
    default: f32,
) -> Result<f32, ConfigError> {
    match parse_from_env::<f32>(var_name)? {
        Some(value) => check_unit_interval(var_name, value),
        None => Ok(default),
    }
}

pub(crate) fn check_unit_interval(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "must be between 0.0 and 1.0".to_string(),
        })
    }
}
