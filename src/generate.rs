//! ASCII art generation.
//!
//! Client for the Gemini `generateContent` API. Each print request makes a
//! single generation call carrying the user's prompt plus a fixed system
//! instruction that constrains the output to a thermal-printer-friendly
//! glyph set and to 42 columns by 20 lines.
//!
//! Compliance with those constraints is advisory: the service is trusted to
//! honor them and nothing here re-validates the returned art.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DadaError;

/// Default base URL for the generation service.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Generation is by far the slowest stage; allow it tens of seconds.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed system instruction sent with every generation request.
///
/// The glyph set is limited to characters the printer's code page renders
/// reliably, and the 42x20 box matches the printable width of the receipt.
pub const SYSTEM_PROMPT: &str = r#"
**Objective:** You are a master ASCII artist. Your sole purpose is to create visual art using a limited set of text characters for a 42-character wide thermal receipt printer.
**CRITICAL RULES:**
1. **CHARACTER SET:** ONLY use: `| - _ / \ + . : = * # % @ ─ │ ┌ ┐ └ ┘ ├ ┤ ┬ ┴ ┼ ░ ▒ ▓ █`
2. **DIMENSIONS:** Width MUST NOT exceed 42 characters. Height MUST NOT exceed 20 lines.
3. **CONTENT:** Your response MUST be ONLY the raw ASCII art itself. NO other text.
"#;

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Response from `generateContent`. Only the text path is of interest;
/// everything else (safety ratings, usage metadata) is ignored.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Extract the generated text at `candidates[0].content.parts[0].text`.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// Client for the art generation service.
pub struct ArtClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl ArtClient {
    /// Create a client against the default Gemini endpoint.
    pub fn new(api_key: String) -> Result<Self, DadaError> {
        Self::with_base_url(api_key, GEMINI_API_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, DadaError> {
        let http_client = reqwest::Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_string(),
            http_client,
        })
    }

    /// Generate ASCII art for the user's prompt.
    ///
    /// ## Errors
    ///
    /// Returns `DadaError::Generation` when the service responds with a
    /// non-success status or the response lacks extractable text, and
    /// `DadaError::Http` on transport failure. Neither is retried.
    pub async fn generate(&self, user_prompt: &str) -> Result<String, DadaError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Gemini API returned {status}: {error_text}");
            return Err(DadaError::Generation(format!(
                "Gemini API error: {status}"
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DadaError::Generation(format!("Unparseable Gemini response: {e}")))?;

        result
            .into_text()
            .ok_or_else(|| DadaError::Generation("AI did not return valid art.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_system_instruction() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "a cat".to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: "rules".to_string(),
                }],
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a cat");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "rules");
        assert!(json.get("system_instruction").is_none());
    }

    #[test]
    fn extracts_text_from_nested_response() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "/\\_/\\"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text(), Some("/\\_/\\".to_string()));
    }

    #[test]
    fn missing_candidates_yields_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn empty_text_is_treated_as_missing() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn candidate_without_content_yields_no_text() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn system_prompt_pins_glyphs_and_dimensions() {
        assert!(SYSTEM_PROMPT.contains("42"));
        assert!(SYSTEM_PROMPT.contains("20 lines"));
        assert!(SYSTEM_PROMPT.contains('█'));
    }
}
