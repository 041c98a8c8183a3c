//! Runtime configuration.
//!
//! All configuration is supplied through the environment (optionally via a
//! `.env` file loaded at startup) and is immutable for the lifetime of the
//! process. Nothing here is ever hardcoded: the relay URL, shared secret and
//! API key identify a specific deployment and belong outside the binary.

use crate::error::DadaError;

/// Default listen port when `PORT` is not set.
const DEFAULT_PORT: u16 = 3001;

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the printer gateway (e.g. an ngrok tunnel to the home server)
    pub relay_url: String,
    /// Shared secret proving relayed jobs originate from this service
    pub secret_key: String,
    /// API key for the art generation service
    pub gemini_api_key: String,
    /// Single origin allowed to call the public endpoint
    pub allowed_origin: String,
    /// Address to listen on (e.g. "0.0.0.0:3001")
    pub listen_addr: String,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// Required: `RELAY_URL`, `SECRET_KEY`, `GEMINI_API_KEY`,
    /// `ALLOWED_ORIGIN`. Optional: `PORT` (defaults to 3001).
    ///
    /// ## Errors
    ///
    /// Returns `DadaError::Config` if any required variable is missing or
    /// empty, or if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, DadaError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| DadaError::Config(format!("PORT is not a valid port: {raw:?}")))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            relay_url: require_env("RELAY_URL")?,
            secret_key: require_env("SECRET_KEY")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            allowed_origin: require_env("ALLOWED_ORIGIN")?,
            listen_addr: format!("0.0.0.0:{port}"),
        })
    }
}

/// Read a required environment variable, rejecting empty values.
fn require_env(name: &str) -> Result<String, DadaError> {
    let value = std::env::var(name)
        .map_err(|_| DadaError::Config(format!("{name} must be set")))?;
    if value.trim().is_empty() {
        return Err(DadaError::Config(format!("{name} must not be empty")));
    }
    Ok(value)
}
