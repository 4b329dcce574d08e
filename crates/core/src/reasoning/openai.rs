use super::ReasoningClient;
use crate::{
    attachment::Attachment, composer::ComposedRequest, error::RemoteError,
    schema::transform_schema,
};
use async_openai::{Client, config::OpenAIConfig, types::CreateChatCompletionResponse};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Name of the structured-output schema sent with `response_format`.
const SCHEMA_NAME: &str = "exam_analysis";

/// Strict structured outputs require every object to forbid extra keys.
fn strict_schema(schema: &Value) -> Value {
    transform_schema(schema, &|ty| ty.to_string(), &|object| {
        object.insert("additionalProperties".to_string(), Value::Bool(false));
    })
}

fn content_part(index: usize, attachment: &Attachment) -> Value {
    if attachment.is_image() {
        json!({
            "type": "image_url",
            "image_url": { "url": attachment.data_url() }
        })
    } else {
        json!({
            "type": "file",
            "file": {
                "filename": format!("attachment-{}", index + 1),
                "file_data": attachment.data_url()
            }
        })
    }
}

fn build_request_body(model: &str, request: &ComposedRequest) -> Value {
    let mut content = Vec::with_capacity(request.attachments.len() + 1);
    content.push(json!({ "type": "text", "text": request.prompt }));
    content.extend(
        request
            .attachments
            .iter()
            .enumerate()
            .map(|(index, attachment)| content_part(index, attachment)),
    );

    json!({
        "model": model,
        "messages": [{ "role": "user", "content": content }],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": SCHEMA_NAME,
                "strict": true,
                "schema": strict_schema(request.response_schema)
            }
        }
    })
}

/// An implementation of `ReasoningClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl ReasoningClient for OpenAICompatibleClient {
    fn provider(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &ComposedRequest) -> Result<String, RemoteError> {
        let body = build_request_body(&self.model, request);
        info!(
            model = %self.model,
            attachments = request.attachments.len(),
            "Sending chat completion request"
        );

        let response: CreateChatCompletionResponse = self
            .client
            .chat()
            .create_byot(body)
            .await
            .map_err(|e| RemoteError::Api(e.to_string()))?;

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{composer::compose, reasoning::test_server::serve_once};

    #[test]
    fn test_request_body_uses_strict_json_schema() {
        let request = compose("s", "q", vec![], vec![]);
        let body = build_request_body("gpt-test", &request);

        assert_eq!(body["model"], "gpt-test");
        let format = &body["response_format"];
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["strict"], true);
        let schema = &format["json_schema"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["properties"]["studyPlan"]["additionalProperties"],
            false
        );
    }

    #[test]
    fn test_request_body_maps_images_and_documents() {
        let request = compose(
            "s",
            "q",
            vec![Attachment {
                data: "SU1H".into(),
                media_type: "image/jpeg".into(),
            }],
            vec![Attachment {
                data: "UERG".into(),
                media_type: "application/pdf".into(),
            }],
        );
        let body = build_request_body("gpt-test", &request);
        let content = body["messages"][0]["content"].as_array().unwrap();

        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/jpeg;base64,SU1H");
        assert_eq!(content[2]["type"], "file");
        assert_eq!(
            content[2]["file"]["file_data"],
            "data:application/pdf;base64,UERG"
        );
        assert_eq!(content[2]["file"]["filename"], "attachment-2");
    }

    fn client_for(base_url: String) -> OpenAICompatibleClient {
        let config = OpenAIConfig::new()
            .with_api_key("test-key")
            .with_api_base(base_url);
        OpenAICompatibleClient::new(config, "gpt-test".into())
    }

    #[tokio::test]
    async fn test_generate_without_content_is_empty_text() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"id":"chatcmpl-1","object":"chat.completion","created":1,"model":"gpt-test","choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#,
        )
        .await;

        let text = client_for(base_url)
            .generate(&compose("s", "q", vec![], vec![]))
            .await
            .unwrap();
        assert_eq!(text, "");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /chat/completions "));
        assert!(request.contains("\"json_schema\""));
    }

    #[tokio::test]
    async fn test_generate_returns_message_content() {
        let (base_url, _server) = serve_once(
            "200 OK",
            r#"{"id":"chatcmpl-2","object":"chat.completion","created":1,"model":"gpt-test","choices":[{"index":0,"message":{"role":"assistant","content":"{\"syllabus\":[]}"},"finish_reason":"stop"}]}"#,
        )
        .await;

        let text = client_for(base_url)
            .generate(&compose("s", "q", vec![], vec![]))
            .await
            .unwrap();
        assert_eq!(text, r#"{"syllabus":[]}"#);
    }

    #[tokio::test]
    async fn test_generate_maps_api_error() {
        let (base_url, _server) = serve_once(
            "400 Bad Request",
            r#"{"error":{"message":"model not found","type":"invalid_request_error","param":null,"code":null}}"#,
        )
        .await;

        match client_for(base_url)
            .generate(&compose("s", "q", vec![], vec![]))
            .await
        {
            Err(RemoteError::Api(message)) => assert!(message.contains("model not found")),
            other => panic!("expected api error, got {:?}", other),
        }
    }
}
