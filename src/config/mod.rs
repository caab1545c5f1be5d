use std::env;

use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub max_connections: u32,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|err| ConfigError::Invalid {
                var: "PORT",
                value: value.clone(),
                reason: err.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        value: value.clone(),
                        reason: "must be at least 1".to_string(),
                    })
                }
                Ok(n) => n,
                Err(err) => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        value: value.clone(),
                        reason: err.to_string(),
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let store = match get("EMPLOYEE_STORE").map(|s| s.trim().to_lowercase()) {
            None => postgres_backend(&get)?,
            Some(kind) if kind == "postgres" => postgres_backend(&get)?,
            Some(kind) if kind == "memory" => StoreBackend::Memory,
            Some(kind) => {
                return Err(ConfigError::Invalid {
                    var: "EMPLOYEE_STORE",
                    value: kind,
                    reason: "expected 'postgres' or 'memory'".to_string(),
                })
            }
        };

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(value) => parse_origins(&value)?,
            None => Vec::new(),
        };

        Ok(Config {
            host,
            port,
            store,
            max_connections,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn postgres_backend<G>(get: &G) -> Result<StoreBackend, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let database_url = get("DATABASE_URL")
        .or_else(|| get("POSTGRES_URI"))
        .ok_or(ConfigError::Missing("DATABASE_URL"))?;
    Ok(StoreBackend::Postgres { database_url })
}

fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            let url = Url::parse(origin).map_err(|err| ConfigError::Invalid {
                var: "ALLOWED_ORIGINS",
                value: origin.to_string(),
                reason: err.to_string(),
            })?;
            // Origins never carry a path, and browsers send them without a trailing slash.
            Ok(url.origin().ascii_serialization())
        })
        .collect()
}
