//! Forwarding to the printer gateway.
//!
//! The gateway sits next to the physical printer behind a tunnel and accepts
//! jobs as JSON: `{ "printData": <base64 payload> }` with an `x-secret-key`
//! header. Base64 keeps the payload byte-exact across the JSON hop; the
//! control bytes at the front are not valid UTF-8 text and would be mangled
//! by any character encoding.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::error::DadaError;

/// Header carrying the shared secret.
pub const SECRET_HEADER: &str = "x-secret-key";

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire envelope for a print job.
#[derive(Debug, Serialize)]
struct PrintEnvelope {
    #[serde(rename = "printData")]
    print_data: String,
}

/// Client for the remote printer gateway.
pub struct RelayClient {
    url: String,
    secret_key: String,
    http_client: reqwest::Client,
}

impl RelayClient {
    pub fn new(url: String, secret_key: String) -> Result<Self, DadaError> {
        let http_client = reqwest::Client::builder().timeout(RELAY_TIMEOUT).build()?;

        Ok(Self {
            url,
            secret_key,
            http_client,
        })
    }

    /// Send an assembled payload to the gateway.
    ///
    /// ## Errors
    ///
    /// Returns `DadaError::Relay` when the gateway responds with a non-2xx
    /// status (the remote error body is logged, never surfaced) and
    /// `DadaError::Http` on transport failure.
    pub async fn send(&self, payload: &[u8]) -> Result<(), DadaError> {
        let envelope = PrintEnvelope {
            print_data: BASE64.encode(payload),
        };

        let response = self
            .http_client
            .post(&self.url)
            .header(SECRET_HEADER, &self.secret_key)
            .json(&envelope)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Printer gateway returned {status}: {error_body}");
            return Err(DadaError::Relay(
                "The printer gateway is offline or encountered an error.".to_string(),
            ));
        }

        Ok(())
    }
}
