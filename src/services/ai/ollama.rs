use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::LlmProvider;
use crate::errors::{AppError, Result};

pub struct OllamaProvider {
    url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            model,
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, schema: &serde_json::Value) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": prompt,
            }],
            "stream": false,
            "format": schema,
            "options": { "temperature": 0.0 },
        });

        let resp = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Ai(format!("failed to call Ollama API: {e}")))?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::Ai(format!("failed to parse Ollama response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Ai(format!("Ollama API error ({status}): {data}")));
        }

        data["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Ai("missing content in Ollama response".to_string()))
    }
}
