//! Host configuration from the environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
    #[error("invalid TORAXVIEW_BIND: {0:?}")]
    InvalidBind(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl HostConfig {
    /// Read `PORT` and `TORAXVIEW_BIND`.
    ///
    /// # Errors
    ///
    /// Either variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("TORAXVIEW_BIND").ok().as_deref(),
        )
    }

    /// Parse raw values; blank or missing values take the defaults.
    ///
    /// # Errors
    ///
    /// A non-blank value that does not parse.
    pub fn from_values(port: Option<&str>, bind: Option<&str>) -> Result<Self, ConfigError> {
        let port = match port.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw.to_owned()))?,
            None => DEFAULT_PORT,
        };
        let bind = match bind.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidBind(raw.to_owned()))?,
            None => DEFAULT_BIND,
        };
        Ok(Self { bind, port })
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
