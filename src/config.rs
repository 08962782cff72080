use crate::domain::Rubles;
use crate::engine::default_point_value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_api_url: String,
    /// Point price applied when neither the template nor the session name
    /// resolves one.
    pub default_point_value: Rubles,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let backend_api_url = env_map
            .get("BACKEND_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("BACKEND_API_URL".to_string()))?;

        let default_point_value = match env_map.get("DEFAULT_POINT_VALUE_RUBLES") {
            Some(raw) => Rubles::from_str_canonical(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "DEFAULT_POINT_VALUE_RUBLES".to_string(),
                    "must be a decimal ruble amount".to_string(),
                )
            })?,
            None => default_point_value(),
        };

        Ok(Config {
            port,
            backend_api_url,
            default_point_value,
        })
    }
}
