// src/infra/errors.rs - Error types for doctor-groq

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    // Provider errors (retriable)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    // User errors
    #[error("No API key found. Set {env_var} or save it to {key_file}.")]
    MissingApiKey { env_var: String, key_file: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChatError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ChatError::Provider {
                retriable: true,
                ..
            } | ChatError::RateLimited { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_provider_error() {
        let err = ChatError::Provider {
            provider: "groq".into(),
            message: "HTTP 503".into(),
            retriable: true,
        };
        assert!(err.is_retriable());
    }

    #[test]
    fn test_rate_limited_is_retriable() {
        let err = ChatError::RateLimited {
            provider: "groq".into(),
            retry_after_ms: 1000,
        };
        assert!(err.is_retriable());
    }

    #[test]
    fn test_missing_key_not_retriable() {
        let err = ChatError::MissingApiKey {
            env_var: "GROQ_API_KEY".into(),
            key_file: "/tmp/groq.key".into(),
        };
        assert!(!err.is_retriable());
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
