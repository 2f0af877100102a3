use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cosden_core::config::{LlmConfig, LlmProvider};
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::llm::LlmClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Blocking HTTP client for the configured completion provider.
#[derive(Debug)]
pub struct HttpLlmClient {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    client: Client,
}

impl HttpLlmClient {
    /// Builds a client from validated config. Returns `None` when the LLM is disabled.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build llm http client")?;

        Ok(Some(Self {
            provider: config.provider,
            endpoint: endpoint(config.provider, config.base_url.as_deref())?,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LlmClient for HttpLlmClient {
    fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&request_body(self.provider, &self.model, prompt, max_tokens));

        match (self.provider, &self.api_key) {
            (LlmProvider::OpenAi, Some(key)) => {
                request = request.bearer_auth(key.expose_secret());
            }
            (LlmProvider::Anthropic, Some(key)) => {
                request = request
                    .header("x-api-key", key.expose_secret())
                    .header("anthropic-version", ANTHROPIC_VERSION);
            }
            _ => {}
        }

        let response = request
            .send()
            .with_context(|| format!("llm request to {} failed", self.endpoint))?
            .error_for_status()
            .context("llm provider returned an error status")?;
        let payload = response.json::<Value>().context("llm response was not valid JSON")?;

        extract_text(self.provider, &payload)
    }
}

fn endpoint(provider: LlmProvider, base_url: Option<&str>) -> Result<String> {
    let base = match (provider, base_url) {
        (_, Some(base_url)) if !base_url.trim().is_empty() => base_url.trim(),
        (LlmProvider::OpenAi, _) => OPENAI_BASE_URL,
        (LlmProvider::Anthropic, _) => ANTHROPIC_BASE_URL,
        (LlmProvider::Ollama, _) => {
            return Err(anyhow!("llm.base_url is required for the ollama provider"))
        }
    };
    let base = base.trim_end_matches('/');

    Ok(match provider {
        LlmProvider::OpenAi => format!("{base}/chat/completions"),
        LlmProvider::Anthropic => format!("{base}/messages"),
        LlmProvider::Ollama => format!("{base}/api/generate"),
    })
}

fn request_body(provider: LlmProvider, model: &str, prompt: &str, max_tokens: usize) -> Value {
    match provider {
        LlmProvider::OpenAi | LlmProvider::Anthropic => json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        }),
        LlmProvider::Ollama => json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": { "num_predict": max_tokens },
        }),
    }
}

fn extract_text(provider: LlmProvider, payload: &Value) -> Result<String> {
    let text = match provider {
        LlmProvider::OpenAi => payload.pointer("/choices/0/message/content"),
        LlmProvider::Anthropic => payload.pointer("/content/0/text"),
        LlmProvider::Ollama => payload.get("response"),
    };

    text.and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("llm response did not contain completion text"))
}

#[cfg(test)]
mod tests {
    use cosden_core::config::{LlmConfig, LlmProvider};
    use serde_json::json;

    use super::{endpoint, extract_text, request_body, HttpLlmClient};

    fn llm_config(enabled: bool, provider: LlmProvider, base_url: Option<&str>) -> LlmConfig {
        LlmConfig {
            enabled,
            provider,
            api_key: Some("sk-test".to_string().into()),
            base_url: base_url.map(str::to_string),
            model: "test-model".to_string(),
            max_output_tokens: 128,
        }
    }

    #[test]
    fn disabled_config_builds_no_client() {
        let client = HttpLlmClient::from_config(&llm_config(false, LlmProvider::OpenAi, None))
            .expect("disabled config is fine");
        assert!(client.is_none());
    }

    #[test]
    fn endpoints_follow_provider_conventions() {
        assert_eq!(
            endpoint(LlmProvider::OpenAi, None).expect("default base"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            endpoint(LlmProvider::Anthropic, Some("https://proxy.internal/v1/")).expect("custom base"),
            "https://proxy.internal/v1/messages"
        );
        assert_eq!(
            endpoint(LlmProvider::Ollama, Some("http://localhost:11434")).expect("ollama base"),
            "http://localhost:11434/api/generate"
        );
        assert!(endpoint(LlmProvider::Ollama, None).is_err());
    }

    #[test]
    fn enabled_config_resolves_endpoint() {
        let client = HttpLlmClient::from_config(&llm_config(
            true,
            LlmProvider::Ollama,
            Some("http://localhost:11434"),
        ))
        .expect("client builds")
        .expect("enabled");
        assert_eq!(client.endpoint(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn request_bodies_carry_output_budget() {
        let chat = request_body(LlmProvider::Anthropic, "m", "hi", 64);
        assert_eq!(chat["max_tokens"], 64);
        assert_eq!(chat["messages"][0]["content"], "hi");

        let generate = request_body(LlmProvider::Ollama, "m", "hi", 64);
        assert_eq!(generate["options"]["num_predict"], 64);
        assert_eq!(generate["stream"], false);
    }

    #[test]
    fn completion_text_is_extracted_per_provider() {
        let openai = json!({ "choices": [{ "message": { "content": "bright" } }] });
        let anthropic = json!({ "content": [{ "type": "text", "text": "glossy" }] });
        let ollama = json!({ "response": "cool", "done": true });

        assert_eq!(extract_text(LlmProvider::OpenAi, &openai).expect("openai"), "bright");
        assert_eq!(extract_text(LlmProvider::Anthropic, &anthropic).expect("anthropic"), "glossy");
        assert_eq!(extract_text(LlmProvider::Ollama, &ollama).expect("ollama"), "cool");
        assert!(extract_text(LlmProvider::Ollama, &openai).is_err());
    }
}
