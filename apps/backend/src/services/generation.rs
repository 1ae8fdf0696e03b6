//! Thin wrapper around an external text-generation server.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::logging::pii::Redacted;

pub const MAX_NEW_TOKENS_CAP: u32 = 256;
pub const REPETITION_PENALTY: f32 = 1.1;
const END_OF_TURN: &str = "<end_of_turn>";

/// Sampling parameters as sent upstream, already clamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub do_sample: bool,
}

impl GenerationParams {
    pub fn clamped(max_length: u32, temperature: f32, top_p: f32, top_k: u32) -> Self {
        Self {
            max_new_tokens: max_length.min(MAX_NEW_TOKENS_CAP),
            temperature: temperature.clamp(0.1, 1.0),
            top_p: top_p.clamp(0.1, 1.0),
            top_k: top_k.clamp(1, 100),
            repetition_penalty: REPETITION_PENALTY,
            do_sample: true,
        }
    }
}

/// Upstream request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParams,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// No generator, connection refused, or timed out
    #[error("generation unavailable: {0}")]
    Unavailable(String),
    /// Upstream answered with an error status or a body we could not read
    #[error("generation failed: {0}")]
    Upstream(String),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        warn!(error = %Redacted(&err.to_string()), "Text generation error");
        match err {
            GenerationError::Unavailable(_) => {
                AppError::generation_unavailable("Text generation is currently unavailable")
            }
            GenerationError::Upstream(_) => {
                AppError::generation_failed("Text generation backend returned an error")
            }
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Raw completion text for `request`; may echo the prompt.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Client for a text-generation-inference style server.
pub struct HttpTextGenerator {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Servers answer with either one object or a one-element array.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(GeneratedText),
    Batch(Vec<GeneratedText>),
}

impl HttpTextGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/generate", self.endpoint);
        debug!(url = %url, max_new_tokens = request.parameters.max_new_tokens, "Calling generation backend");

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream(format!("status {status}: {body}")));
        }

        match resp.json::<GenerateResponse>().await {
            Ok(GenerateResponse::Single(out)) => Ok(out.generated_text),
            Ok(GenerateResponse::Batch(mut outs)) if !outs.is_empty() => {
                Ok(outs.swap_remove(0).generated_text)
            }
            Ok(GenerateResponse::Batch(_)) => {
                Err(GenerationError::Upstream("empty response".to_string()))
            }
            Err(e) => Err(GenerationError::Upstream(format!("undecodable response: {e}"))),
        }
    }
}

/// Wrap a user prompt in the chat turn markers the model expects.
pub fn format_prompt(prompt: &str) -> String {
    format!("<start_of_turn>user\n{prompt}{END_OF_TURN}\n<start_of_turn>model")
}

/// Drop the echoed prompt and anything after the first end-of-turn marker.
pub fn clean_output(raw: &str, formatted_prompt: &str) -> String {
    let without_prompt = raw.replace(formatted_prompt, "");
    let trimmed = without_prompt.trim();
    match trimmed.split_once(END_OF_TURN) {
        Some((head, _)) => head.trim().to_string(),
        None => trimmed.to_string(),
    }
}

pub async fn generate_text(
    generator: &dyn TextGenerator,
    prompt: &str,
    params: GenerationParams,
) -> Result<String, GenerationError> {
    let formatted = format_prompt(prompt);
    let request = GenerationRequest {
        inputs: formatted.clone(),
        parameters: params,
    };
    let raw = generator.generate(&request).await?;
    Ok(clean_output(&raw, &formatted))
}
