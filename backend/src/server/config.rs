//! HTTP server configuration assembled from the environment.

use std::env;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) port: u16,
    pub(crate) secret: String,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `WARDLINE_SECRET_KEY` (falling back to `SECRET_KEY`) signs tokens;
    /// debug builds substitute an ephemeral secret when neither is set,
    /// release builds refuse to start. `WARDLINE_PORT`/`PORT` and
    /// `WARDLINE_BIND_ADDR` control the listener.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the secret is missing in a release
    /// build or the configured port does not parse.
    pub fn from_env() -> std::io::Result<Self> {
        let secret = resolve_secret(
            env::var("WARDLINE_SECRET_KEY")
                .or_else(|_| env::var("SECRET_KEY"))
                .ok(),
        )?;
        let port = resolve_port(
            env::var("WARDLINE_PORT")
                .or_else(|_| env::var("PORT"))
                .ok(),
        )?;
        let bind_addr =
            env::var("WARDLINE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        Ok(Self {
            bind_addr,
            port,
            secret,
        })
    }

    #[must_use]
    pub fn new(bind_addr: impl Into<String>, port: u16, secret: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            port,
            secret: secret.into(),
        }
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

fn resolve_secret(configured: Option<String>) -> std::io::Result<String> {
    match configured {
        Some(secret) if !secret.trim().is_empty() => Ok(secret),
        _ if cfg!(debug_assertions) => {
            warn!("no signing secret configured; using an ephemeral secret (dev only)");
            let secret: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(48)
                .map(char::from)
                .collect();
            Ok(secret)
        }
        _ => Err(std::io::Error::other(
            "WARDLINE_SECRET_KEY (or SECRET_KEY) must be set",
        )),
    }
}

fn resolve_port(configured: Option<String>) -> std::io::Result<u16> {
    match configured {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid port {raw:?}: {e}"))),
    }
}
