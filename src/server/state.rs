//! Server state and configuration.

use crate::config::Config;
use crate::error::DadaError;
use crate::generate::ArtClient;
use crate::geo::GeoClient;
use crate::relay::RelayClient;

/// Application state shared across handlers.
///
/// Everything here is read-only after startup; handlers never share mutable
/// state across requests.
pub struct AppState {
    pub config: Config,
    pub geo: GeoClient,
    pub art: ArtClient,
    pub relay: RelayClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, DadaError> {
        let geo = GeoClient::new()?;
        let art = ArtClient::new(config.gemini_api_key.clone())?;
        let relay = RelayClient::new(config.relay_url.clone(), config.secret_key.clone())?;

        Ok(Self {
            config,
            geo,
            art,
            relay,
        })
    }
}
