//! Google Gemini `generateContent` client.
//!
//! Attachments are sent inline (`inlineData`) next to the instructional text,
//! and the response is constrained with `responseMimeType` and
//! `responseSchema`.

use super::ReasoningClient;
use crate::{composer::ComposedRequest, error::RemoteError, schema::transform_schema};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

// --- Local Gemini REST types (for encapsulation) ---
mod gemini_types {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    #[derive(Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerateContentRequest {
        pub contents: Vec<Content>,
        pub generation_config: GenerationConfig,
    }
    #[derive(Serialize, Debug)]
    pub(super) struct Content {
        pub role: String,
        pub parts: Vec<Part>,
    }
    #[derive(Serialize, Debug)]
    #[serde(untagged)]
    pub(super) enum Part {
        Text {
            text: String,
        },
        InlineData {
            #[serde(rename = "inlineData")]
            inline_data: Blob,
        },
    }
    #[derive(Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Blob {
        pub mime_type: String,
        pub data: String,
    }
    #[derive(Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerationConfig {
        pub response_mime_type: String,
        pub response_schema: Value,
    }
    #[derive(Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
        pub prompt_feedback: Option<PromptFeedback>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Candidate {
        pub content: Option<CandidateContent>,
        pub finish_reason: Option<String>,
    }
    #[derive(Deserialize, Debug)]
    pub(super) struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<ResponsePart>,
    }
    #[derive(Deserialize, Debug)]
    pub(super) struct ResponsePart {
        pub text: Option<String>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PromptFeedback {
        pub block_reason: Option<String>,
    }
}

use gemini_types::*;

/// Converts the shared descriptor to Gemini's OpenAPI-style schema, which
/// spells types in upper case.
fn gemini_schema(schema: &Value) -> Value {
    transform_schema(schema, &|ty| ty.to_uppercase(), &|_| {})
}

fn build_request_body(request: &ComposedRequest) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(request.attachments.len() + 1);
    parts.push(Part::Text {
        text: request.prompt.clone(),
    });
    parts.extend(request.attachments.iter().map(|attachment| Part::InlineData {
        inline_data: Blob {
            mime_type: attachment.media_type.clone(),
            data: attachment.data.clone(),
        },
    }));

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: gemini_schema(request.response_schema),
        },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: &GenerateContentResponse) -> String {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        warn!(block_reason = %reason, "Gemini blocked the prompt");
    }

    let Some(candidate) = response.candidates.first() else {
        return String::new();
    };
    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            warn!(finish_reason = %reason, "Gemini candidate finished early");
        }
    }
    candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect()
}

/// A `ReasoningClient` backed by the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The Gemini API key, sent as `x-goog-api-key`.
    /// * `model` - Model identifier (e.g., "gemini-3-pro-preview").
    /// * `base_url` - API root; `None` uses the public endpoint.
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ReasoningClient for GeminiClient {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &ComposedRequest) -> Result<String, RemoteError> {
        let body = build_request_body(request);
        info!(
            model = %self.model,
            attachments = request.attachments.len(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(status = status.as_u16(), error = %err, "Could not read Gemini error body");
                    String::new()
                }
            };
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_text(&parsed))
    }
}
