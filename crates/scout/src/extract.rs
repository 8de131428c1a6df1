//! Requirements extraction — the boundary where raw job-description text
//! becomes structured `JobRequirements`.
//!
//! The pipeline only depends on the `RequirementsExtractor` trait and is
//! handed a concrete implementation at construction. `LlmExtractor` is the
//! production adapter (Anthropic Messages API); tests inject canned
//! requirements instead.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ScoutError;
use crate::models::requirements::JobRequirements;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const MAX_RETRIES: u32 = 3;

const EXTRACTION_SYSTEM: &str = "You extract structured hiring requirements from job descriptions. \
Respond with JSON only, no prose.";

const EXTRACTION_PROMPT: &str = r#"Extract the hiring requirements from this job description.
Return JSON with exactly these fields:
{"required_skills": ["..."], "preferred_skills": ["..."], "level": "junior|mid|senior", "years_experience": {"min": 0, "max": 0}}

Job description:
{jd_text}"#;

/// Turns opaque job text into validated requirements. Implementations own
/// all natural-language concerns; the pipeline never sees raw text.
#[async_trait]
pub trait RequirementsExtractor: Send + Sync {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, ScoutError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

/// Anthropic-backed extractor. Retries rate limits and server errors with
/// exponential backoff, bounded by `MAX_RETRIES`.
pub struct LlmExtractor {
    client: Client,
    api_key: String,
}

impl LlmExtractor {
    pub fn new(api_key: String) -> Self {
        LlmExtractor {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
            api_key,
        }
    }

    async fn call(&self, prompt: &str) -> Result<String, ScoutError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: EXTRACTION_SYSTEM,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_status = 0;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying extraction call");
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                last_status = status.as_u16();
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ScoutError::Extraction(format!(
                    "API returned {status}: {message}"
                )));
            }

            let parsed: MessagesResponse = response.json().await?;
            return parsed
                .content
                .iter()
                .find(|b| b.block_type == "text")
                .and_then(|b| b.text.clone())
                .ok_or_else(|| ScoutError::Extraction("empty model response".to_string()));
        }

        Err(ScoutError::Extraction(format!(
            "gave up after {MAX_RETRIES} attempts (last status {last_status})"
        )))
    }
}

#[async_trait]
impl RequirementsExtractor for LlmExtractor {
    async fn extract(&self, job_text: &str) -> Result<JobRequirements, ScoutError> {
        let prompt = EXTRACTION_PROMPT.replace("{jd_text}", job_text);
        let text = self.call(&prompt).await?;
        let json = strip_json_fences(&text);
        serde_json::from_str(json)
            .map_err(|e| ScoutError::Extraction(format!("model returned invalid JSON: {e}")))
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences when the model wraps its
/// output anyway.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(prefix) {
            return stripped
                .trim_start()
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or_else(|| stripped.trim_start());
        }
    }
    text
}
