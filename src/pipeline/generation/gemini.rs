use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{GenerationResponse, LlmClient};
use super::GenerationError;
use crate::config::Settings;

/// Gemini HTTP client for quiz generation.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        Self::from_builder(client_builder(timeout_secs), base_url, model, api_key, timeout_secs)
    }

    fn from_builder(
        builder: reqwest::blocking::ClientBuilder,
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let client = builder.build().map_err(GenerationError::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Client from settings; `NotConfigured` when no API key is set.
    pub fn from_settings(settings: &Settings) -> Result<Self, GenerationError> {
        let api_key = settings
            .api_key
            .as_deref()
            .ok_or(GenerationError::NotConfigured)?;
        Self::new(
            &settings.api_base,
            &settings.model,
            api_key,
            settings.llm_timeout_secs,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn client_builder(timeout_secs: u64) -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder().timeout(Duration::from_secs(timeout_secs))
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response body from `generateContent`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl From<GenerateContentResponse> for GenerationResponse {
    fn from(raw: GenerateContentResponse) -> Self {
        let first = raw.candidates.into_iter().next();

        let text = first
            .as_ref()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());

        let finish_block = first
            .and_then(|c| c.finish_reason)
            .filter(|reason| reason != "STOP" && reason != "MAX_TOKENS");

        let block_reason = raw
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .or(if text.is_none() { finish_block } else { None });

        GenerationResponse { text, block_reason }
    }
}

impl LlmClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    GenerationError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GenerationError::ResponseDecoding(e.to_string()))?;

        Ok(parsed.into())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock LLM client for testing. Returns a configurable response and
/// remembers every prompt it was given.
pub struct MockLlmClient {
    response: GenerationResponse,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self::with_response(GenerationResponse::from_text(response))
    }

    pub fn with_response(response: GenerationResponse) -> Self {
        Self {
            response,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
