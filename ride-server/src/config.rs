//! Server configuration from the environment.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::namma_yatri::{DEFAULT_BASE_URL, NammaYatriConfig};
use crate::session::RegistryConfig;

/// A variable was set to something we can't use.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub upstream: NammaYatriConfig,
    pub sessions: RegistryConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Unset variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RegistryConfig::default();

        let host = load(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = load(&lookup, "PORT", 3000u16)?;
        let base_url = lookup("NAMMA_YATRI_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                info!("NAMMA_YATRI_BASE_URL not set, using default: {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_string()
            });
        let timeout_secs = load(&lookup, "NAMMA_YATRI_TIMEOUT_SECS", 5u64)?;
        let idle_secs = load(&lookup, "SESSION_IDLE_SECS", defaults.idle.as_secs())?;
        let max_capacity = load(&lookup, "SESSION_MAX_CAPACITY", defaults.max_capacity)?;

        Ok(Self {
            host,
            port,
            upstream: NammaYatriConfig::new()
                .with_base_url(base_url)
                .with_timeout(timeout_secs),
            sessions: RegistryConfig {
                idle: Duration::from_secs(idle_secs),
                max_capacity,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
