use thiserror::Error;

use std::time::Duration;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server settings read from the environment (and `.env`).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub scheduler_interval: Duration,
    pub cookie_secure: bool,
    /// Admin created on startup when the email is not registered yet.
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";
    pub const DEFAULT_SCHEDULER_INTERVAL_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL")
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string());

        let scheduler_secs = match get("SCHEDULER_INTERVAL_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SCHEDULER_INTERVAL_SECS",
                        value,
                    });
                }
            },
            None => Self::DEFAULT_SCHEDULER_INTERVAL_SECS,
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(value) => match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "COOKIE_SECURE",
                        value,
                    });
                }
            },
            None => true,
        };

        let bootstrap_admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_EMAIL")),
        };

        Ok(Self {
            database_url,
            bind_addr,
            scheduler_interval: Duration::from_secs(scheduler_secs),
            cookie_secure,
            bootstrap_admin,
        })
    }
}
