//! Gemini `generateContent` client.
//!
//! # Responsibility
//! - Send one prompt (plus optional inline image) per call over blocking HTTP.
//! - Map provider status codes onto `GenerationError` variants.
//!
//! # Invariants
//! - Exactly one HTTP request per `generate`; no retry, no custom timeout.
//! - The API key travels in the `x-goog-api-key` header, never in logs.

use super::{GenerationError, GenerationRequest, GenerationResult, TextGenerator};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use log::{error, info};
use serde_json::{json, Value};
use std::time::Instant;

/// Public Gemini REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when configuration does not override it.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Blocking Gemini client.
pub struct GeminiClient {
    api_key: Option<String>,
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;
        let started_at = Instant::now();
        info!(
            "event=ai_generate module=ai status=start provider=gemini model={} prompt_chars={} has_image={}",
            request.model,
            request.prompt.chars().count(),
            request.image.is_some()
        );

        let response = self
            .client
            .post(self.url_for(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&build_request_body(request))
            .send()
            .map_err(|err| {
                error!(
                    "event=ai_generate module=ai status=error provider=gemini duration_ms={} error_code=transport is_timeout={} is_connect={}",
                    started_at.elapsed().as_millis(),
                    err.is_timeout(),
                    err.is_connect()
                );
                GenerationError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(
                "event=ai_generate module=ai status=error provider=gemini duration_ms={} error_code=http status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(map_status_error(status.as_u16(), &request.model, body));
        }

        let payload: Value = response
            .json()
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))?;
        let text = extract_response_text(&payload)?;
        info!(
            "event=ai_generate module=ai status=ok provider=gemini duration_ms={} response_chars={}",
            started_at.elapsed().as_millis(),
            text.chars().count()
        );
        Ok(text)
    }
}

/// Builds the JSON body for one `generateContent` call.
pub fn build_request_body(request: &GenerationRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": BASE64_STANDARD.encode(&image.bytes),
            }
        }));
    }
    json!({ "contents": [{ "role": "user", "parts": parts }] })
}

/// Concatenates the text parts of the first candidate.
pub fn extract_response_text(payload: &Value) -> GenerationResult<String> {
    let parts = payload["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .ok_or(GenerationError::EmptyResponse)?;

    let text = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

fn map_status_error(status: u16, model: &str, body: String) -> GenerationError {
    match status {
        400 if body.contains("API_KEY_INVALID") => GenerationError::InvalidCredentials(body),
        401 | 403 => GenerationError::InvalidCredentials(body),
        404 => GenerationError::ModelNotFound(model.to_string()),
        429 => GenerationError::RateLimited(body),
        _ => GenerationError::Http { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::{build_request_body, extract_response_text, map_status_error, GeminiClient};
    use crate::ai::{GenerationError, GenerationRequest, ImagePayload, TextGenerator};
    use serde_json::json;

    fn request(image: Option<ImagePayload>) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-1.5-flash".to_string(),
            prompt: "summarize".to_string(),
            image,
        }
    }

    #[test]
    fn body_carries_prompt_and_inline_image() {
        let body = build_request_body(&request(Some(ImagePayload {
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        })));
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "summarize");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "AQID");
    }

    #[test]
    fn body_without_image_has_single_part() {
        let body = build_request_body(&request(None));
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn extract_joins_text_parts() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "a " }, { "text": "b" }] } }]
        });
        assert_eq!(extract_response_text(&payload).unwrap(), "a b");
    }

    #[test]
    fn extract_rejects_missing_candidates() {
        let err = extract_response_text(&json!({ "candidates": [] })).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn status_mapping_distinguishes_upstream_failures() {
        assert!(matches!(
            map_status_error(429, "m", String::new()),
            GenerationError::RateLimited(_)
        ));
        assert!(matches!(
            map_status_error(404, "m", String::new()),
            GenerationError::ModelNotFound(model) if model == "m"
        ));
        assert!(matches!(
            map_status_error(400, "m", "API_KEY_INVALID".to_string()),
            GenerationError::InvalidCredentials(_)
        ));
        assert!(matches!(
            map_status_error(500, "m", "boom".to_string()),
            GenerationError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn generate_without_key_fails_before_network() {
        let client = GeminiClient::new(Some("   ".to_string()));
        let err = client.generate(&request(None)).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
