/// LLM layer — the single point of entry for all generative-model calls.
///
/// `GeminiClient` wraps the Google generative-language HTTP API behind the
/// `TextModel` trait; `FallbackGenerator` walks an ordered model priority
/// list until one candidate succeeds. No other module issues model calls
/// directly.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod templates;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_OUTPUT_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.4;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Failure of one call to one model candidate.
#[derive(Debug, Error)]
pub enum ModelCallError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("model returned empty content")]
    EmptyContent,
}

impl ModelCallError {
    fn is_rate_limit(&self) -> bool {
        matches!(self, ModelCallError::RateLimited(_))
    }
}

/// One failed candidate in a fallback run, in attempted order.
#[derive(Debug, Clone, Serialize)]
pub struct ModelAttempt {
    pub model: String,
    pub error: String,
}

/// Raised only when every candidate in the chain has failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("all {} candidate models failed: {}", .attempts.len(), summarize(.attempts))]
    Exhausted { attempts: Vec<ModelAttempt> },
}

fn summarize(attempts: &[ModelAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.model, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

// ────────────────────────────────────────────────────────────────────────────
// TextModel trait + Gemini implementation
// ────────────────────────────────────────────────────────────────────────────

/// Opaque text-in/text-out generation backend, keyed by model identifier.
/// Carried as `&dyn TextModel` so tests can script outcomes without a server.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, ModelCallError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

/// Production backend for the Google generative-language API.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, ModelCallError> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model_id);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ModelCallError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelCallError::Transport(e.to_string()))?;

        if status.as_u16() == 429 {
            return Err(ModelCallError::RateLimited(body));
        }
        if !status.is_success() {
            return Err(ModelCallError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| ModelCallError::Api {
                status: status.as_u16(),
                message: format!("unparseable response body: {e}"),
            })?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelCallError::EmptyContent);
        }

        debug!("Model {model_id} returned {} chars", text.len());
        Ok(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback chain
// ────────────────────────────────────────────────────────────────────────────

/// When and how long to pause on a provider rate limit.
///
/// The delay applies to same-model retries only: a rate-limited candidate is
/// retried after the delay up to `same_model_retries` times, then the chain
/// advances to the next model immediately. Non-rate-limit failures advance
/// immediately with no sleep.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub rate_limit_delay: Duration,
    pub same_model_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            rate_limit_delay: Duration::from_secs(5),
            same_model_retries: 1,
        }
    }
}

/// A successful generation, with the candidates that failed before it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_used: String,
    pub attempts: Vec<ModelAttempt>,
}

/// Ordered fallback chain over model identifiers. Stateless across
/// invocations: no memory of which candidate last failed.
#[derive(Clone)]
pub struct FallbackGenerator {
    models: Vec<String>,
    backoff: BackoffPolicy,
}

impl FallbackGenerator {
    pub fn new(models: Vec<String>, backoff: BackoffPolicy) -> Self {
        Self { models, backoff }
    }

    pub async fn generate(
        &self,
        backend: &dyn TextModel,
        prompt: &str,
    ) -> Result<GenerationResult, GenerationError> {
        let mut attempts: Vec<ModelAttempt> = Vec::new();

        for model in &self.models {
            let mut rate_limit_tries = 0;
            loop {
                match backend.generate(model, prompt).await {
                    Ok(text) => {
                        return Ok(GenerationResult {
                            text,
                            model_used: model.clone(),
                            attempts,
                        });
                    }
                    Err(e) if e.is_rate_limit()
                        && rate_limit_tries < self.backoff.same_model_retries =>
                    {
                        rate_limit_tries += 1;
                        warn!(
                            "Model {model} rate limited, retrying in {}s ({rate_limit_tries}/{})",
                            self.backoff.rate_limit_delay.as_secs(),
                            self.backoff.same_model_retries
                        );
                        tokio::time::sleep(self.backoff.rate_limit_delay).await;
                    }
                    Err(e) => {
                        warn!("Model {model} failed: {e}");
                        attempts.push(ModelAttempt {
                            model: model.clone(),
                            error: e.to_string(),
                        });
                        break;
                    }
                }
            }
        }

        Err(GenerationError::Exhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Backend whose outcomes are scripted per model, consumed in call order.
    struct ScriptedModel {
        script: Mutex<HashMap<String, VecDeque<Result<String, ModelCallError>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<(&str, Vec<Result<String, ModelCallError>>)>) -> Self {
            Self {
                script: Mutex::new(
                    script
                        .into_iter()
                        .map(|(m, outcomes)| (m.to_string(), outcomes.into_iter().collect()))
                        .collect(),
                ),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn generate(&self, model_id: &str, _prompt: &str) -> Result<String, ModelCallError> {
            self.calls.lock().unwrap().push(model_id.to_string());
            self.script
                .lock()
                .unwrap()
                .get_mut(model_id)
                .and_then(|q| q.pop_front())
                .unwrap_or(Err(ModelCallError::EmptyContent))
        }
    }

    fn chain(models: &[&str], backoff: BackoffPolicy) -> FallbackGenerator {
        FallbackGenerator::new(models.iter().map(|m| m.to_string()).collect(), backoff)
    }

    fn api_error(msg: &str) -> ModelCallError {
        ModelCallError::Api {
            status: 500,
            message: msg.to_string(),
        }
    }

    #[tokio::test]
    async fn test_third_model_succeeds_after_two_failures() {
        let backend = ScriptedModel::new(vec![
            ("m1", vec![Err(api_error("boom"))]),
            ("m2", vec![Err(ModelCallError::Transport("refused".into()))]),
            ("m3", vec![Ok("generated text".to_string())]),
        ]);
        let generator = chain(&["m1", "m2", "m3"], BackoffPolicy::default());

        let result = generator.generate(&backend, "prompt").await.unwrap();

        assert_eq!(result.model_used, "m3");
        assert_eq!(result.text, "generated text");
        let attempted: Vec<&str> = result.attempts.iter().map(|a| a.model.as_str()).collect();
        assert_eq!(attempted, ["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_exhaustion_enumerates_all_attempts_in_order() {
        let backend = ScriptedModel::new(vec![
            ("m1", vec![Err(api_error("first"))]),
            ("m2", vec![Err(api_error("second"))]),
            ("m3", vec![Err(ModelCallError::EmptyContent)]),
        ]);
        let generator = chain(&["m1", "m2", "m3"], BackoffPolicy::default());

        let err = generator.generate(&backend, "prompt").await.unwrap_err();

        let GenerationError::Exhausted { attempts } = err;
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[0].model, "m1");
        assert!(attempts[0].error.contains("first"));
        assert_eq!(attempts[1].model, "m2");
        assert!(attempts[1].error.contains("second"));
        assert_eq!(attempts[2].model, "m3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retries_same_model_then_succeeds() {
        let backend = ScriptedModel::new(vec![(
            "m1",
            vec![
                Err(ModelCallError::RateLimited("429".into())),
                Ok("after backoff".to_string()),
            ],
        )]);
        let generator = chain(&["m1", "m2"], BackoffPolicy::default());

        let result = generator.generate(&backend, "prompt").await.unwrap();

        assert_eq!(result.model_used, "m1");
        assert!(result.attempts.is_empty());
        assert_eq!(backend.calls(), ["m1", "m1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_retries_then_advances() {
        let backend = ScriptedModel::new(vec![
            (
                "m1",
                vec![
                    Err(ModelCallError::RateLimited("429".into())),
                    Err(ModelCallError::RateLimited("429 again".into())),
                ],
            ),
            ("m2", vec![Ok("fallback".to_string())]),
        ]);
        let generator = chain(&["m1", "m2"], BackoffPolicy::default());

        let result = generator.generate(&backend, "prompt").await.unwrap();

        assert_eq!(result.model_used, "m2");
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].model, "m1");
        assert_eq!(backend.calls(), ["m1", "m1", "m2"]);
    }

    #[tokio::test]
    async fn test_non_rate_limit_failure_does_not_sleep_or_retry() {
        let backend = ScriptedModel::new(vec![
            ("m1", vec![Err(api_error("hard failure"))]),
            ("m2", vec![Ok("ok".to_string())]),
        ]);
        // Unpaused test: would hang for 5s per retry if a sleep were taken.
        let generator = chain(&["m1", "m2"], BackoffPolicy::default());

        let result = generator.generate(&backend, "prompt").await.unwrap();

        assert_eq!(backend.calls(), ["m1", "m2"]);
        assert_eq!(result.model_used, "m2");
    }
}
