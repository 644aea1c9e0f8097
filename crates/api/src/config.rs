//! Process configuration, sourced from the environment at startup.

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the HTTP listener binds to (`PORT`).
    pub port: u16,
    /// Connection string for the store (`DATABASE_URL`). Required.
    pub database_url: String,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `DATABASE_URL` is mandatory; `PORT` falls back to a dev default.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw:?}"))?,
            Err(_) => {
                tracing::warn!("PORT not set; using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        Ok(Self { port, database_url })
    }
}
