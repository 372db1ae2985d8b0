// src/provider/resolver.rs - API key lookup and provider construction

use std::sync::Arc;
use std::time::Duration;

use super::openai_compat::OpenAICompatProvider;
use super::retry::{RetryConfig, RetryProvider};
use super::ModelProvider;
use crate::infra::config::ProviderConfig;
use crate::infra::errors::ChatError;
use crate::infra::paths;

/// Resolve the API key: env var first, then the saved credential file
/// (~/.doctor-groq/credentials/{provider}.key).
pub async fn resolve_api_key(config: &ProviderConfig) -> Result<String, ChatError> {
    if let Ok(key) = std::env::var(&config.api_key_env) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            tracing::debug!(source = %config.api_key_env, "API key found in environment");
            return Ok(key);
        }
    }

    let key_path = paths::key_file(&config.id);
    if let Some(key) = load_saved_key(&key_path).await {
        tracing::debug!(source = %key_path.display(), "API key loaded from credential file");
        return Ok(key);
    }

    Err(ChatError::MissingApiKey {
        env_var: config.api_key_env.clone(),
        key_file: key_path.display().to_string(),
    })
}

async fn load_saved_key(path: &std::path::Path) -> Option<String> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Build the shared provider: an OpenAI-compatible client wrapped in retries.
pub fn build_provider(config: &ProviderConfig, api_key: String) -> Arc<dyn ModelProvider> {
    let client = OpenAICompatProvider::new(
        config.id.clone(),
        config.name.clone(),
        api_key,
        config.base_url.clone(),
        Duration::from_secs(config.timeout_seconds),
    );
    let retry = RetryConfig {
        max_retries: config.max_retries,
        ..Default::default()
    };
    Arc::new(RetryProvider::with_config(Arc::new(client), retry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_saved_key_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groq.key");
        std::fs::write(&path, "  gsk_test_123\n").unwrap();
        assert_eq!(load_saved_key(&path).await.as_deref(), Some("gsk_test_123"));
    }

    #[tokio::test]
    async fn test_load_saved_key_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groq.key");
        std::fs::write(&path, "\n").unwrap();
        assert!(load_saved_key(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_load_saved_key_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_saved_key(&dir.path().join("none.key")).await.is_none());
    }

    #[test]
    fn test_build_provider_keeps_identity() {
        let provider = build_provider(&ProviderConfig::default(), "key".into());
        assert_eq!(provider.id(), "groq");
        assert_eq!(provider.name(), "Groq");
    }
}
