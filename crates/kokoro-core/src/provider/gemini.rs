use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;

use super::CompletionProvider;

/// Model identifier every chat turn is sent to.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Google Gemini API provider.
///
/// Owns its HTTP client; construct once at startup and share via
/// `Arc<dyn CompletionProvider>`. Only a connect timeout is set: a slow
/// generation is allowed to take as long as it needs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_base: Option<String>) -> Self {
        let base = api_base
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key,
            api_base: base.trim_end_matches('/').to_string(),
            model: GEMINI_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        });

        debug!("Gemini request with model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let data: serde_json::Value = response.json().await?;
        parse_response(&data)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn parse_response(data: &serde_json::Value) -> Result<String, ProviderError> {
    let candidate = data
        .get("candidates")
        .and_then(|v| v.get(0))
        .ok_or_else(|| ProviderError::Parse("No candidates in response".to_string()))?;

    let parts = candidate
        .get("content")
        .and_then(|v| v.get("parts"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::Parse("No parts in response".to_string()))?;

    let mut text = String::new();
    for part in parts {
        if let Some(t) = part.get("text").and_then(|v| v.as_str()) {
            text.push_str(t);
        }
    }

    if text.is_empty() {
        return Err(ProviderError::Parse("No text in response".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_text() {
        let data = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "there"}]}
            }]
        });
        assert_eq!(parse_response(&data).unwrap(), "Hello there");
    }

    #[test]
    fn test_parse_response_no_candidates() {
        let data = json!({"candidates": []});
        let err = parse_response(&data).unwrap_err();
        assert!(err.to_string().contains("No candidates"));
    }

    #[test]
    fn test_parse_response_no_text() {
        let data = json!({
            "candidates": [{"content": {"parts": [{"functionCall": {}}]}}]
        });
        assert!(parse_response(&data).is_err());
    }

    #[test]
    fn test_model_is_fixed() {
        let provider = GeminiProvider::new("key".to_string(), None);
        assert_eq!(provider.model(), GEMINI_MODEL);
    }
}
