//! OpenAI-compatible chat completion oracle.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::{self, SYSTEM_PROMPT};
use super::{Oracle, OracleError};
use crate::types::{OracleChoice, OracleRequest, Usage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-5-mini";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// `OPENAI_API_KEY`, plus optional `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self, OracleError> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let mut config = Self::new(api_key.trim());
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        if config.api_key.is_empty() {
            return Err(OracleError::MissingApiKey);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiOracle {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiConfig) -> Result<Self, OracleError> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize, Default)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: ApiUsage,
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn choose_option(&self, request: &OracleRequest) -> Result<OracleChoice, OracleError> {
        let body = serde_json::json!({
            "model": &self.config.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt::render(request)}
            ]
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let api_response: ApiResponse = response.json().await?;
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or(OracleError::NoChoices)?;

        tracing::debug!(
            "OpenAI usage: prompt={} completion={} total={}",
            api_response.usage.prompt_tokens,
            api_response.usage.completion_tokens,
            api_response.usage.total_tokens
        );

        Ok(OracleChoice {
            choice: choice.message.content.unwrap_or_default().trim().to_string(),
            usage: Usage::new(
                api_response.usage.prompt_tokens,
                api_response.usage.completion_tokens,
                api_response.usage.total_tokens,
            ),
        })
    }
}
