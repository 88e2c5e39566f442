// ABOUTME: Environment configuration for the formiq binary

use std::env;
use std::num::ParseIntError;
use thiserror::Error;

const DEFAULT_PORT: u16 = 4311;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_DATABASE_URL: &str = "sqlite://formiq.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub database_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_port(&env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()))?;

        Ok(Config {
            port,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").ok(),
        })
    }

    /// The API key, required by `serve` and `worker` but not `seed`.
    pub fn require_api_key(&self) -> Result<String, ConfigError> {
        self.openai_api_key.clone().ok_or(ConfigError::MissingApiKey)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let port = raw.parse::<u16>()?;
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}
