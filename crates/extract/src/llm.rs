use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExtractError;
use crate::prompt;

/// How the document reaches the model: a handle to a copy uploaded to the
/// service file store (PDF), or the decoded text embedded in the request.
#[derive(Debug, Clone)]
pub enum DocumentRef {
    FileId(String),
    InlineText(String),
}

/// One generation call. Exactly one of {no schema, schema} per request:
/// `schema: None` is the free-form call, `schema: Some(..)` asks the service
/// to enforce the constraint server-side as well.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub document: DocumentRef,
    pub instruction: String,
    pub schema: Option<Value>,
}

/// Seam to the hosted generation service. The pipeline only ever talks to
/// this trait, so tests swap in canned stubs with no network.
#[allow(async_fn_in_trait)]
pub trait GenerationService {
    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>)
    -> Result<String, ExtractError>;

    async fn generate(&self, request: &ExtractionRequest) -> Result<String, ExtractError>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
    JsonObject,
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct FileUploadResponse {
    id: String,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            max_tokens: 8000,
            client: reqwest::Client::new(),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ExtractError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ExtractError::ServiceStatus { status, body })
        }
    }
}

impl GenerationService for OpenAiClient {
    /// Upload the raw document bytes to the service file store. The returned
    /// id is only valid for the lifetime of that remote copy.
    async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ExtractError> {
        let url = format!("{}/v1/files", self.base_url);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "user_data")
            .part("file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let upload: FileUploadResponse = response.json().await?;
        Ok(upload.id)
    }

    async fn generate(&self, request: &ExtractionRequest) -> Result<String, ExtractError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response_format = match &request.schema {
            Some(schema) => ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "curriculum".to_string(),
                    strict: true,
                    schema: schema.clone(),
                },
            },
            None => ResponseFormat::JsonObject,
        };

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.instruction.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt::document_message(&request.document),
                },
            ],
            // Lowest randomness the service offers, for run-to-run stability
            temperature: 0.0,
            max_tokens: self.max_tokens,
            response_format,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let chat: ChatResponse = response.json().await?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ExtractError::EmptyResponse)
    }
}
