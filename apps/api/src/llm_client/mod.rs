//! LLM Client: the single point of entry for all model calls in TalentScout.
//!
//! ARCHITECTURAL RULE: No other module may call the inference API directly.
//! All model interactions go through the `CompletionModel` trait.
//!
//! No retry loop here. A failed call is reported to the
//! interview flow, which shows it inline and lets the user trigger it again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

#[cfg(test)]
pub mod fake;

pub use prompts::{GenerationParams, Prompt};

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
/// The instruction-tuned model every prompt template is written for.
pub const MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const TOP_P: f32 = 0.95;
const REPETITION_PENALTY: f32 = 1.15;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that turns a prompt into free text.
///
/// Carried in `AppState` as `Arc<dyn CompletionModel>`.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Returns the raw completion. Empty or rambling output is passed through
    /// untouched; interpreting it is the caller's job.
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The endpoint answers with a list for batched inputs and a bare object
/// for some deployments; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl InferenceResponse {
    fn into_text(self) -> String {
        match self {
            InferenceResponse::Batch(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .unwrap_or_default(),
            InferenceResponse::Single(g) => g.generated_text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// Hugging Face Inference API client for the hosted Mistral model.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key,
            endpoint: format!("{HF_INFERENCE_URL}/{MODEL}"),
        })
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let inputs = prompt.to_instruct();
        let request_body = InferenceRequest {
            inputs: &inputs,
            parameters: InferenceParameters {
                max_new_tokens: prompt.params.max_new_tokens,
                temperature: prompt.params.temperature,
                top_p: TOP_P,
                repetition_penalty: REPETITION_PENALTY,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Inference API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = serde_json::from_str::<InferenceResponse>(&body)?.into_text();
        debug!(
            "LLM call succeeded: prompt_chars={}, completion_chars={}",
            inputs.len(),
            text.len()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_response_takes_first_generation() {
        let body = r#"[{"generated_text": "Score: 7"}, {"generated_text": "ignored"}]"#;
        let parsed: InferenceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text(), "Score: 7");
    }

    #[test]
    fn test_single_object_response() {
        let body = r#"{"generated_text": "hello"}"#;
        let parsed: InferenceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text(), "hello");
    }

    #[test]
    fn test_empty_batch_passes_through_as_empty_text() {
        let parsed: InferenceResponse = serde_json::from_str("[]").unwrap();
        assert_eq!(parsed.into_text(), "");
    }

    #[test]
    fn test_request_body_shape() {
        let body = InferenceRequest {
            inputs: "<s>[INST] hi [/INST]",
            parameters: InferenceParameters {
                max_new_tokens: 200,
                temperature: 0.7,
                top_p: TOP_P,
                repetition_penalty: REPETITION_PENALTY,
                return_full_text: false,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["parameters"]["max_new_tokens"], 200);
        assert_eq!(json["parameters"]["return_full_text"], false);
        assert_eq!(json["inputs"], "<s>[INST] hi [/INST]");
    }

    #[test]
    fn test_error_body_parses() {
        let err: InferenceError =
            serde_json::from_str(r#"{"error": "Model is currently loading"}"#).unwrap();
        assert_eq!(err.error, "Model is currently loading");
    }
}
