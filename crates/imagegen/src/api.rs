//! REST client for the Gemini `generateContent` endpoint.
//!
//! Sends a single text prompt and asks for one square image back. The
//! first inline image part of the first candidate becomes the result.

use async_trait::async_trait;
use serde::Deserialize;

use lumina_core::images::data_uri;
use lumina_core::policy::{DEFAULT_GEMINI_BASE_URL, DEFAULT_IMAGE_MODEL, IMAGE_ASPECT_RATIO};
use lumina_core::types::ImagePayload;

use crate::client::ImageBackend;

/// HTTP client for the Gemini image model.
pub struct GeminiApi {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

/// Errors from a single generation call.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the body, or the raw body.
        message: String,
        /// `error.status` from the body, e.g. `RESOURCE_EXHAUSTED`.
        reason: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

impl GenerateContentResponse {
    fn into_image(self) -> Option<ImagePayload> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.inline_data)
            .map(|d| data_uri(&d.mime_type, &d.data))
    }
}

// ---------------------------------------------------------------------------
// GeminiApi
// ---------------------------------------------------------------------------

impl GeminiApi {
    /// Client for the public endpoint and default image model.
    ///
    /// A missing key is not rejected here; the call fails upstream and is
    /// handled like any other failure.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            DEFAULT_GEMINI_BASE_URL.to_string(),
            DEFAULT_IMAGE_MODEL.to_string(),
            api_key,
        )
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Self {
        if api_key.is_none() {
            tracing::warn!("No Gemini API key configured -- generation calls will fail");
        }
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate one image for `prompt`.
    ///
    /// Returns `Ok(None)` when the call succeeds but carries no image part.
    pub async fn generate_content(&self, prompt: &str) -> Result<Option<ImagePayload>, ImageGenError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "imageConfig": { "aspectRatio": IMAGE_ASPECT_RATIO },
            },
        });

        let mut request = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = Self::ensure_success(request.send().await?).await?;
        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed.into_image())
    }

    // ---- private helpers ----

    /// Map a non-2xx response onto [`ImageGenError::Api`], pulling
    /// `error.message` / `error.status` out of the body when present.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ImageGenError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let (message, reason) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(env) if !env.error.message.is_empty() => (env.error.message, env.error.status),
            Ok(env) => (body, env.error.status),
            Err(_) => (body, None),
        };

        Err(ImageGenError::Api {
            status: status.as_u16(),
            message,
            reason,
        })
    }
}

#[async_trait]
impl ImageBackend for GeminiApi {
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImagePayload>, ImageGenError> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_inline_part_of_first_candidate_wins() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"here you go"},{"inlineData":{"mimeType":"image/png","data":"QUJD"}}]}},
                {"content":{"parts":[{"inlineData":{"mimeType":"image/jpeg","data":"WFla"}}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_image().as_deref(), Some("data:image/png;base64,QUJD"));
    }

    #[test]
    fn text_only_or_empty_responses_have_no_image() {
        let text_only: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#).unwrap();
        assert!(text_only.into_image().is_none());

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_image().is_none());

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(blocked.into_image().is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = GeminiApi::new(Some("k".into())).with_base_url("http://localhost:1234/");
        assert_eq!(api.base_url, "http://localhost:1234");
        assert_eq!(api.model(), DEFAULT_IMAGE_MODEL);
    }
}
