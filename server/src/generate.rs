use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

// Attribution headers OpenRouter uses for app rankings.
const HTTP_REFERER: &str = "http://localhost:3000";
const X_TITLE: &str = "kb-chat";
const TEMPERATURE: f64 = 0.3;

/// Produces the assistant reply for a grounded prompt. The trait seam keeps
/// the HTTP surface testable without a live generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible chat-completions endpoint (OpenRouter by
/// default). The API key comes from the environment at startup; an empty key
/// fails requests early instead of sending unauthenticated calls.
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Generator for OpenRouterClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("OPENROUTER_API_KEY is not set");
        }
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": TEMPERATURE
        });
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", HTTP_REFERER)
            .header("X-Title", X_TITLE)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("generation API error {status}: {text}");
        }
        let data: Value = resp.json().await?;
        let reply = data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "No response.".to_string());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_trailing_slash_from_the_base_url() {
        let client = OpenRouterClient::new("https://openrouter.ai/api/v1/", "key", "model");
        assert_eq!(client.base_url, "https://openrouter.ai/api/v1");
    }

    #[tokio::test]
    async fn empty_api_key_fails_before_any_request() {
        // The base URL points nowhere routable; the bail must come first.
        let client = OpenRouterClient::new("http://127.0.0.1:9", "", "model");
        let err = client.complete("system", "user").await.unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }
}
