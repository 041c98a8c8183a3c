//! The generate-and-print handler.
//!
//! Orchestrates the whole relay pipeline for one request: validate the form,
//! resolve the caller's location, generate the art, assemble the printer
//! payload, and forward it to the gateway. Stages run strictly in sequence;
//! the first hard failure short-circuits to an error response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::DadaError;
use crate::payload::PrintJob;

use super::super::state::AppState;

/// Form data for a print request.
///
/// Fields are optional at the serde level so that a missing field reaches
/// the validator (and gets a 400) instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_initial: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

/// Handle `POST /` and `POST /generate-and-print`.
pub async fn generate_and_print(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(form): Json<PrintForm>,
) -> Response {
    // Validate input before any outbound call is made
    let Some((first_name, last_initial, user_prompt)) = validate(&form) else {
        return error_response(&DadaError::Validation(
            "All fields are required.".to_string(),
        ));
    };

    tracing::info!("Print request from {first_name} {last_initial}.");

    // Best-effort geolocation; never fails the request
    let caller_ip = caller_ip(&headers, connect_info);
    let location = state.geo.lookup(caller_ip.as_deref()).await;

    let art = match state.art.generate(&user_prompt).await {
        Ok(art) => art,
        Err(e) => return error_response(&e),
    };

    let payload = PrintJob {
        first_name,
        last_initial,
        location,
        prompt: user_prompt,
        art,
    }
    .assemble();

    if let Err(e) = state.relay.send(&payload).await {
        return error_response(&e);
    }

    tracing::info!("Print job relayed ({} bytes)", payload.len());
    (
        StatusCode::OK,
        Json(json!({"message": "Print job sent successfully!"})),
    )
        .into_response()
}

/// Check all three fields are present and non-empty, returning them trimmed.
fn validate(form: &PrintForm) -> Option<(String, String, String)> {
    let first_name = non_empty(form.first_name.as_deref())?;
    let last_initial = non_empty(form.last_initial.as_deref())?;
    let user_prompt = non_empty(form.user_prompt.as_deref())?;
    Some((first_name, last_initial, user_prompt))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Determine the caller's IP: first hop of `x-forwarded-for` when present
/// (we sit behind a proxy in production), otherwise the peer address.
fn caller_ip(headers: &HeaderMap, connect_info: Option<ConnectInfo<SocketAddr>>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    forwarded.or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
}

/// Log the failure with full detail, answer with the caller-safe mapping.
fn error_response(error: &DadaError) -> Response {
    match error {
        DadaError::Validation(msg) => tracing::info!("Rejected print request: {msg}"),
        _ => tracing::error!("Print request failed: {error}"),
    }

    (
        error.status_code(),
        Json(json!({"error": error.public_message()})),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first: Option<&str>, last: Option<&str>, prompt: Option<&str>) -> PrintForm {
        PrintForm {
            first_name: first.map(String::from),
            last_initial: last.map(String::from),
            user_prompt: prompt.map(String::from),
        }
    }

    #[test]
    fn validate_accepts_complete_form() {
        let form = form(Some("Ada"), Some("L"), Some("a cat"));
        assert_eq!(
            validate(&form),
            Some(("Ada".to_string(), "L".to_string(), "a cat".to_string()))
        );
    }

    #[test]
    fn validate_trims_whitespace() {
        let form = form(Some("  Ada "), Some(" L"), Some("a cat  "));
        let (first, last, prompt) = validate(&form).unwrap();
        assert_eq!(first, "Ada");
        assert_eq!(last, "L");
        assert_eq!(prompt, "a cat");
    }

    #[test]
    fn validate_rejects_missing_or_blank_fields() {
        assert!(validate(&form(None, Some("L"), Some("a cat"))).is_none());
        assert!(validate(&form(Some("Ada"), None, Some("a cat"))).is_none());
        assert!(validate(&form(Some("Ada"), Some("L"), None)).is_none());
        assert!(validate(&form(Some("Ada"), Some(""), Some("a cat"))).is_none());
        assert!(validate(&form(Some("   "), Some("L"), Some("a cat"))).is_none());
    }

    #[test]
    fn form_deserializes_camel_case_keys() {
        let form: PrintForm = serde_json::from_str(
            r#"{"firstName": "Ada", "lastInitial": "L", "userPrompt": "a cat"}"#,
        )
        .unwrap();
        assert_eq!(form.first_name.as_deref(), Some("Ada"));
        assert_eq!(form.last_initial.as_deref(), Some("L"));
        assert_eq!(form.user_prompt.as_deref(), Some("a cat"));
    }

    #[test]
    fn form_tolerates_missing_keys() {
        let form: PrintForm = serde_json::from_str(r#"{"firstName": "Ada"}"#).unwrap();
        assert!(form.last_initial.is_none());
        assert!(form.user_prompt.is_none());
    }

    #[test]
    fn caller_ip_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let peer = ConnectInfo("192.0.2.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            caller_ip(&headers, Some(peer)),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn caller_ip_falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        let peer = ConnectInfo("192.0.2.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(caller_ip(&headers, Some(peer)), Some("192.0.2.1".to_string()));
        assert_eq!(caller_ip(&headers, None), None);
    }
}
