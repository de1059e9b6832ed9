//! Environment-based configuration.
//!
//! Responsibility:
//! - Load and validate settings from env vars (dotenv-aware).
//! - Fail startup on missing/invalid values instead of running with unsafe
//!   defaults (an unauthenticated gateway is worse than no gateway).

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Base URL of the identity provider API.
    pub identity_api_url: String,
    /// Secret key used to authenticate this service against the provider.
    pub identity_secret_key: String,
    /// Expected issuer/audience, forwarded with every verification request.
    pub identity_issuer: Option<String>,
    pub identity_audience: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret key
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("identity_api_url", &self.identity_api_url)
            .field("identity_issuer", &self.identity_issuer)
            .field("identity_audience", &self.identity_audience)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let identity_api_url = std::env::var("IDENTITY_API_URL")
            .map_err(|_| ConfigError::Missing("IDENTITY_API_URL"))?;

        // An empty key would let the service start but fail every request;
        // treat it the same as a missing one.
        let identity_secret_key = std::env::var("IDENTITY_SECRET_KEY")
            .map_err(|_| ConfigError::Missing("IDENTITY_SECRET_KEY"))?;
        if identity_secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid("IDENTITY_SECRET_KEY"));
        }

        let identity_issuer = std::env::var("IDENTITY_ISSUER")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let identity_audience = std::env::var("IDENTITY_AUDIENCE")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            identity_api_url,
            identity_secret_key,
            identity_issuer,
            identity_audience,
        })
    }
}
