//! # Dada Relay - Public Print Relay Service
//!
//! Dada Relay is the public-facing half of a two-server thermal printer
//! installation. It accepts print requests from the web front end, enriches
//! them with caller geolocation and AI-generated ASCII art, assembles a
//! printer-ready byte stream, and forwards it to the printer gateway running
//! next to the physical hardware.
//!
//! ## Request Pipeline
//!
//! Each request flows through four stages in strict sequence:
//!
//! ```text
//! validate fields -> resolve location -> generate art -> assemble + relay
//! ```
//!
//! Geolocation is best-effort and degrades to a fixed fallback; every other
//! stage short-circuits the request with an error response.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Environment-sourced runtime configuration |
//! | [`geo`] | Caller IP geolocation client |
//! | [`generate`] | ASCII art generation client |
//! | [`payload`] | Printer payload assembly |
//! | [`relay`] | Authenticated forwarding to the printer gateway |
//! | [`server`] | HTTP surface and request orchestration |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod generate;
pub mod geo;
pub mod payload;
pub mod relay;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use error::DadaError;
