// src/provider/openai_compat.rs - OpenAI-compatible chat completions client
//
// Groq serves both the conversational Llama models and Llama Guard behind
// the same `/chat/completions` endpoint, so one client covers both.

use async_trait::async_trait;
use std::time::Duration;

use super::{ChatRequest, ChatResponse, ModelProvider, TokenUsage};
use crate::infra::errors::ChatError;

/// Fallback wait when a 429 carries no usable `retry-after` header.
const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 5_000;

/// Provider for any OpenAI-compatible API endpoint (Groq by default).
pub struct OpenAICompatProvider {
    id_str: String,
    name_str: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAICompatProvider {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("doctor-groq/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {e}");
                reqwest::Client::new()
            });
        Self {
            id_str: id.into(),
            name_str: name.into(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn provider_error(&self, message: impl Into<String>, retriable: bool) -> ChatError {
        ChatError::Provider {
            provider: self.id_str.clone(),
            message: message.into(),
            retriable,
        }
    }
}

/// Serialize a request into the OpenAI chat-completions body.
pub(crate) fn request_body(request: &ChatRequest) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = request
        .messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        })
        .collect();

    let mut body = serde_json::json!({
        "model": request.model,
        "messages": messages,
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = serde_json::json!(max_tokens);
    }
    if let Some(temp) = request.temperature {
        body["temperature"] = serde_json::json!(temp);
    }
    body
}

/// Pull the first choice's text out of a chat-completions response.
///
/// A response without `choices[0].message.content` is malformed, not empty.
pub(crate) fn parse_response(resp: &serde_json::Value) -> Option<ChatResponse> {
    let content = resp["choices"][0]["message"]["content"].as_str()?.to_string();
    let usage = TokenUsage {
        input_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    };
    Some(ChatResponse { content, usage })
}

/// Parse a `retry-after` header value given in seconds.
fn retry_after_ms(value: Option<&reqwest::header::HeaderValue>) -> u64 {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .map(|secs| (secs * 1000.0) as u64)
        .unwrap_or(DEFAULT_RATE_LIMIT_DELAY_MS)
}

#[async_trait]
impl ModelProvider for OpenAICompatProvider {
    fn id(&self) -> &str {
        &self.id_str
    }

    fn name(&self) -> &str {
        &self.name_str
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let body = request_body(&request);

        tracing::debug!(
            provider = %self.id_str,
            model = %request.model,
            messages = request.messages.len(),
            "POST /chat/completions"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.provider_error(e.to_string(), e.is_timeout() || e.is_connect()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited {
                provider: self.id_str.clone(),
                retry_after_ms: retry_after_ms(response.headers().get("retry-after")),
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.provider_error(
                format!("HTTP {}: {}", status, error_body),
                status.is_server_error(),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.provider_error(format!("Failed to parse response: {e}"), false))?;

        parse_response(&resp)
            .ok_or_else(|| self.provider_error("Response has no message content", false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_request_body_includes_sampling_params() {
        let request = ChatRequest {
            model: "llama-guard-3-8b".into(),
            messages: vec![Message::user("hello")],
            max_tokens: Some(10),
            temperature: Some(0.0),
        };
        let body = request_body(&request);
        assert_eq!(body["model"], "llama-guard-3-8b");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 10);
        assert_eq!(body["temperature"], 0.0);
    }

    #[test]
    fn test_request_body_omits_unset_params() {
        let request = ChatRequest {
            model: "m".into(),
            messages: vec![Message::system("persona"), Message::user("hi")],
            ..Default::default()
        };
        let body = request_body(&request);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_response_ok() {
        let resp = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "unsafe\nS4"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        });
        let parsed = parse_response(&resp).unwrap();
        assert_eq!(parsed.content, "unsafe\nS4");
        assert_eq!(parsed.usage.total(), 15);
    }

    #[test]
    fn test_parse_response_missing_content() {
        let resp = serde_json::json!({"choices": []});
        assert!(parse_response(&resp).is_none());
    }

    #[test]
    fn test_retry_after_header() {
        let v = HeaderValue::from_static("2");
        assert_eq!(retry_after_ms(Some(&v)), 2000);
        let bad = HeaderValue::from_static("soon");
        assert_eq!(retry_after_ms(Some(&bad)), DEFAULT_RATE_LIMIT_DELAY_MS);
        assert_eq!(retry_after_ms(None), DEFAULT_RATE_LIMIT_DELAY_MS);
    }
}
