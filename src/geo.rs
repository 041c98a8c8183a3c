//! Caller geolocation.
//!
//! Resolves a caller IP to a human-readable "City, Region, Country" string
//! via ipapi.co. This stage is strictly best-effort: any failure (no IP,
//! transport error, non-2xx, incomplete data) degrades to a fixed fallback
//! string and never fails the print request.

use std::time::Duration;

use serde::Deserialize;

use crate::error::DadaError;

/// Fallback shown on the receipt when the caller can't be located.
pub const UNKNOWN_LOCATION: &str = "An unknown location";

/// Default base URL for the geolocation service.
pub const GEO_API_BASE_URL: &str = "https://ipapi.co";

/// Geolocation is a nicety; keep the timeout short so a slow provider
/// can't stall the whole pipeline.
const GEO_TIMEOUT: Duration = Duration::from_secs(3);

/// Relevant subset of the ipapi.co response.
#[derive(Debug, Deserialize)]
struct GeoLookup {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
}

impl GeoLookup {
    /// Render to a display string if all three fields are present and
    /// non-empty.
    fn display(&self) -> Option<String> {
        let city = non_empty(self.city.as_deref())?;
        let region = non_empty(self.region.as_deref())?;
        let country = non_empty(self.country_name.as_deref())?;
        Some(format!("{city}, {region}, {country}"))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Client for the IP geolocation service.
pub struct GeoClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl GeoClient {
    /// Create a client against the default ipapi.co endpoint.
    pub fn new() -> Result<Self, DadaError> {
        Self::with_base_url(GEO_API_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(base_url: String) -> Result<Self, DadaError> {
        let http_client = reqwest::Client::builder().timeout(GEO_TIMEOUT).build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Resolve an optional caller IP to a display string.
    ///
    /// Always returns a usable string; on any failure the fixed
    /// [`UNKNOWN_LOCATION`] fallback is returned and the cause is logged.
    pub async fn lookup(&self, ip: Option<&str>) -> String {
        let Some(ip) = ip.filter(|ip| !ip.trim().is_empty()) else {
            return UNKNOWN_LOCATION.to_string();
        };

        match self.try_lookup(ip.trim()).await {
            Some(location) => location,
            None => UNKNOWN_LOCATION.to_string(),
        }
    }

    async fn try_lookup(&self, ip: &str) -> Option<String> {
        let url = format!("{}/{}/json/", self.base_url, ip);

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Geolocation lookup failed for {ip}: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Geolocation lookup for {ip} returned {}",
                response.status()
            );
            return None;
        }

        let lookup: GeoLookup = match response.json().await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!("Geolocation response for {ip} was not valid JSON: {e}");
                return None;
            }
        };

        let display = lookup.display();
        if display.is_none() {
            tracing::warn!("Geolocation data for {ip} was incomplete");
        }
        display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_all_three_fields() {
        let lookup = GeoLookup {
            city: Some("Paris".to_string()),
            region: Some("Ile-de-France".to_string()),
            country_name: Some("France".to_string()),
        };
        assert_eq!(
            lookup.display(),
            Some("Paris, Ile-de-France, France".to_string())
        );
    }

    #[test]
    fn display_requires_every_field() {
        let missing_region = GeoLookup {
            city: Some("Paris".to_string()),
            region: None,
            country_name: Some("France".to_string()),
        };
        assert_eq!(missing_region.display(), None);

        let empty_city = GeoLookup {
            city: Some("".to_string()),
            region: Some("Ile-de-France".to_string()),
            country_name: Some("France".to_string()),
        };
        assert_eq!(empty_city.display(), None);
    }

    #[test]
    fn lookup_parses_partial_response() {
        // ipapi returns many more fields; unknown keys must be ignored and
        // absent keys tolerated.
        let json = r#"{"ip": "1.2.3.4", "city": "Paris", "version": "IPv4"}"#;
        let lookup: GeoLookup = serde_json::from_str(json).unwrap();
        assert_eq!(lookup.city.as_deref(), Some("Paris"));
        assert_eq!(lookup.display(), None);
    }

    #[tokio::test]
    async fn lookup_without_ip_returns_fallback() {
        let client = GeoClient::with_base_url("http://localhost:9".to_string()).unwrap();
        assert_eq!(client.lookup(None).await, UNKNOWN_LOCATION);
        assert_eq!(client.lookup(Some("  ")).await, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn lookup_against_dead_server_returns_fallback() {
        // Port 9 (discard) refuses connections; the client must degrade.
        let client = GeoClient::with_base_url("http://localhost:9".to_string()).unwrap();
        assert_eq!(client.lookup(Some("8.8.8.8")).await, UNKNOWN_LOCATION);
    }
}
