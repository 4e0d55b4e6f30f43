use std::{env, net::SocketAddr};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub const DEFAULT_BIND_PORT: u16 = 4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    /// Echo response ids with their original JSON type instead of as strings.
    pub preserve_id_type: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("ECHO_PRESERVE_ID_TYPE must be a boolean")]
    InvalidPreserveIdType,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

/// Command line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_addr: Option<String>,
    pub bind_port: Option<u16>,
    pub preserve_id_type: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            bind_port: DEFAULT_BIND_PORT,
            preserve_id_type: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_port = lookup("BIND_PORT")
            .map(|value| {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort)
            })
            .transpose()?
            .unwrap_or(DEFAULT_BIND_PORT);
        let preserve_id_type = lookup("ECHO_PRESERVE_ID_TYPE")
            .map(|value| parse_bool(&value).ok_or(ConfigError::InvalidPreserveIdType))
            .transpose()?
            .unwrap_or(false);

        let config = Self {
            bind_addr,
            bind_port,
            preserve_id_type,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if let Some(bind_addr) = overrides.bind_addr {
            self.bind_addr = bind_addr;
        }
        if let Some(bind_port) = overrides.bind_port {
            self.bind_port = bind_port;
        }
        if let Some(preserve_id_type) = overrides.preserve_id_type {
            self.preserve_id_type = preserve_id_type;
        }

        let _ = self.bind_socket()?;
        Ok(self)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
