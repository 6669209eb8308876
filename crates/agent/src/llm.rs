use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use pricelens_core::config::{LlmConfig, LlmProvider};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// HTTP client for the configured completion provider. OpenAI and Ollama
/// speak the chat-completions shape; Anthropic uses its messages API.
pub struct HttpLlmClient {
    http: reqwest::Client,
    provider: LlmProvider,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpLlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if config.provider.requires_api_key() && config.api_key.is_none() {
            return Err(anyhow!("provider requires an api key and none is configured"));
        }

        let base_url = config.base_url.clone().unwrap_or_else(|| {
            match config.provider {
                LlmProvider::OpenAi => "https://api.openai.com".to_owned(),
                LlmProvider::Anthropic => "https://api.anthropic.com".to_owned(),
                LlmProvider::Ollama => "http://localhost:11434".to_owned(),
            }
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building http client")?;

        Ok(Self {
            http,
            provider: config.provider,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.as_ref().map(|key| key.expose_secret().to_owned()),
            model: config.model.clone(),
        })
    }

    async fn complete_chat(&self, prompt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct ChatReply {
            choices: Vec<ChatChoice>,
        }
        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }
        #[derive(Deserialize)]
        struct ChatMessage {
            content: String,
        }

        let mut request = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
            }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let reply: ChatReply = request
            .send()
            .await
            .context("chat completion request failed")?
            .error_for_status()
            .context("chat completion returned an error status")?
            .json()
            .await
            .context("chat completion reply was not valid json")?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion reply carried no choices"))
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct MessagesReply {
            content: Vec<ContentBlock>,
        }
        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }

        let key = self.api_key.as_deref().ok_or_else(|| anyhow!("anthropic requires an api key"))?;

        let reply: MessagesReply = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": 2048,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .context("messages request failed")?
            .error_for_status()
            .context("messages request returned an error status")?
            .json()
            .await
            .context("messages reply was not valid json")?;

        reply
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| anyhow!("messages reply carried no text block"))
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAi | LlmProvider::Ollama => self.complete_chat(prompt).await,
            LlmProvider::Anthropic => self.complete_anthropic(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricelens_core::config::LlmConfig;

    fn config(provider: LlmProvider, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: api_key.map(|key| key.to_owned().into()),
            base_url: None,
            model: "test-model".to_owned(),
            timeout_secs: 5,
            max_retries: 2,
            retry_delay_secs: 2,
        }
    }

    #[test]
    fn key_requiring_provider_without_key_is_rejected() {
        assert!(HttpLlmClient::from_config(&config(LlmProvider::OpenAi, None)).is_err());
        assert!(HttpLlmClient::from_config(&config(LlmProvider::Ollama, None)).is_ok());
    }

    #[test]
    fn default_base_urls_follow_the_provider() {
        let client =
            HttpLlmClient::from_config(&config(LlmProvider::Anthropic, Some("sk-test"))).unwrap();
        assert_eq!(client.base_url, "https://api.anthropic.com");

        let client = HttpLlmClient::from_config(&config(LlmProvider::Ollama, None)).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
