//! HTTP Completion Clients
//!
//! One reqwest-backed client per tenant vendor: Anthropic Messages API,
//! OpenAI Chat Completions and Gemini `generateContent`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use hibiki::{
    ChatMessage, CompletionClient, CompletionClientFactory, CompletionOptions, DomainError,
    MessageRole, Vendor,
};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Builds [`HttpCompletionClient`]s sharing one connection pool
#[derive(Clone)]
pub struct HttpCompletionFactory {
    client: Client,
    options: CompletionOptions,
}

impl HttpCompletionFactory {
    pub fn new() -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            options: CompletionOptions::default(),
        })
    }

    /// Concrete client, for callers that are not behind the factory port
    pub fn client(&self, vendor: Vendor, api_key: &str, model: &str) -> Option<HttpCompletionClient> {
        let api_key = api_key.trim();
        if api_key.is_empty() || model.trim().is_empty() {
            return None;
        }

        Some(HttpCompletionClient {
            client: self.client.clone(),
            vendor,
            api_key: api_key.to_string(),
            model: model.trim().to_string(),
            options: self.options.clone(),
        })
    }
}

impl CompletionClientFactory for HttpCompletionFactory {
    fn create_client(&self, vendor: Vendor, api_key: &str, model: &str) -> Option<Arc<dyn CompletionClient>> {
        let client: Arc<dyn CompletionClient> = Arc::new(self.client(vendor, api_key, model)?);
        Some(client)
    }
}

pub struct HttpCompletionClient {
    client: Client,
    vendor: Vendor,
    api_key: String,
    model: String,
    options: CompletionOptions,
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn generate(
        &self,
        turns: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> Result<String, DomainError> {
        let system_prompt = system_prompt.map(str::trim).filter(|s| !s.is_empty());

        let request = match self.vendor {
            Vendor::Anthropic => self
                .client
                .post(ANTHROPIC_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&anthropic_request(&self.model, turns, system_prompt, &self.options)),
            Vendor::OpenAI => self
                .client
                .post(OPENAI_URL)
                .bearer_auth(&self.api_key)
                .json(&openai_request(&self.model, turns, system_prompt, &self.options)),
            Vendor::Google => self
                .client
                .post(format!(
                    "{}/{model}:generateContent?key={api_key}",
                    GEMINI_BASE_URL,
                    model = self.model,
                    api_key = self.api_key
                ))
                .json(&gemini_request(turns, system_prompt, &self.options)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("{} request failed: {e}", self.vendor)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(self.vendor, status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("{} response unreadable: {e}", self.vendor)))?;

        let text = match self.vendor {
            Vendor::Anthropic => extract_anthropic_text(&payload),
            Vendor::OpenAI => extract_openai_text(&payload),
            Vendor::Google => extract_gemini_text(&payload),
        };

        Ok(text.unwrap_or_default())
    }

    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Request Types
// ============================================

#[derive(Debug, Serialize, PartialEq)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

/// Anthropic rejects consecutive turns of the same role; join them with
/// blank lines instead.
fn merge_consecutive(turns: &[ChatMessage]) -> Vec<WireMessage> {
    let mut merged: Vec<WireMessage> = Vec::with_capacity(turns.len());
    for turn in turns {
        let role = role_name(turn.role);
        match merged.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&turn.content);
            }
            _ => merged.push(WireMessage {
                role,
                content: turn.content.clone(),
            }),
        }
    }
    merged
}

fn anthropic_request<'a>(
    model: &'a str,
    turns: &[ChatMessage],
    system: Option<&'a str>,
    options: &CompletionOptions,
) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        system,
        messages: merge_consecutive(turns),
    }
}

fn openai_request<'a>(
    model: &'a str,
    turns: &[ChatMessage],
    system: Option<&str>,
    options: &CompletionOptions,
) -> OpenAiRequest<'a> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    if let Some(system) = system {
        messages.push(WireMessage {
            role: "system",
            content: system.to_string(),
        });
    }
    messages.extend(turns.iter().map(|t| WireMessage {
        role: role_name(t.role),
        content: t.content.clone(),
    }));

    OpenAiRequest {
        model,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        messages,
    }
}

fn gemini_request(turns: &[ChatMessage], system: Option<&str>, options: &CompletionOptions) -> GeminiRequest {
    GeminiRequest {
        system_instruction: system.map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: text.to_string() }],
        }),
        contents: turns
            .iter()
            .map(|t| GeminiContent {
                role: Some(match t.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                }),
                parts: vec![GeminiPart {
                    text: t.content.clone(),
                }],
            })
            .collect(),
        generation_config: GeminiGenerationConfig {
            max_output_tokens: options.max_tokens,
            temperature: options.temperature,
        },
    }
}

// ============================================
// Helper Functions
// ============================================

fn map_http_error(vendor: Vendor, status: StatusCode, body: String) -> DomainError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DomainError::Configuration(format!("{} rejected credentials: {}", vendor, body))
        }
        StatusCode::TOO_MANY_REQUESTS => DomainError::ExternalService(format!("{} rate limited", vendor)),
        _ => DomainError::ExternalService(format!("{} API error ({}): {}", vendor, status.as_u16(), body)),
    }
}

fn join_texts<'a>(texts: impl Iterator<Item = &'a str>) -> Option<String> {
    let collected: Vec<&str> = texts.map(str::trim).filter(|t| !t.is_empty()).collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

fn extract_anthropic_text(root: &Value) -> Option<String> {
    let blocks = root.get("content")?.as_array()?;
    join_texts(
        blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str)),
    )
}

fn extract_openai_text(root: &Value) -> Option<String> {
    root.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn extract_gemini_text(root: &Value) -> Option<String> {
    let parts = root
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    join_texts(parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)))
}
