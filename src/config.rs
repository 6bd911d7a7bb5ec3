use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;
use axum::http::StatusCode;

/// How a create/update that collides on `email` is reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateEmailStatus {
    /// 404, the historical behaviour clients may depend on.
    NotFound,
    /// 409.
    Conflict,
}

impl DuplicateEmailStatus {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
        }
    }
}

impl FromStr for DuplicateEmailStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_found" | "404" => Ok(Self::NotFound),
            "conflict" | "409" => Ok(Self::Conflict),
            other => anyhow::bail!("unknown duplicate email status: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub duplicate_email: DuplicateEmailStatus,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://users.db".into(),
            max_connections: 5,
            host: "0.0.0.0".into(),
            port: 8080,
            duplicate_email: DuplicateEmailStatus::NotFound,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults
    /// for every unset key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {v}"))?,
            None => defaults.max_connections,
        };
        let port = match lookup("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {v}"))?,
            None => defaults.port,
        };
        let duplicate_email = match lookup("DUPLICATE_EMAIL_STATUS") {
            Some(v) => v.parse()?,
            None => defaults.duplicate_email,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections,
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port,
            duplicate_email,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
