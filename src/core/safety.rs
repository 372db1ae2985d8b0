// src/core/safety.rs - Moderation gate around the safety model

use std::sync::Arc;

use super::hazard::{self, HazardMatch, HazardRecord};
use crate::infra::errors::ChatError;
use crate::provider::{ChatRequest, Message, ModelProvider};

/// Token budget for the moderation reply ("safe" or "unsafe\nS<n>").
pub const CLASSIFIER_MAX_TOKENS: u32 = 10;
/// Greedy decoding so one moderation model gives one answer per input.
pub const CLASSIFIER_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe(&'static HazardRecord),
}

/// Result of screening one piece of text.
///
/// `fault` is set when the moderation call failed; the verdict is then
/// always `Safe`.
#[derive(Debug)]
pub struct Classification {
    pub verdict: Verdict,
    pub fault: Option<ChatError>,
}

impl Classification {
    pub fn is_safe(&self) -> bool {
        matches!(self.verdict, Verdict::Safe)
    }

    pub fn hazard(&self) -> Option<&'static HazardRecord> {
        match self.verdict {
            Verdict::Safe => None,
            Verdict::Unsafe(h) => Some(h),
        }
    }

    pub fn hazard_code(&self) -> Option<&'static str> {
        self.hazard().map(|h| h.code)
    }
}

pub struct SafetyClassifier {
    provider: Arc<dyn ModelProvider>,
    policy: HazardMatch,
}

impl SafetyClassifier {
    pub fn new(provider: Arc<dyn ModelProvider>, policy: HazardMatch) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> HazardMatch {
        self.policy
    }

    /// Screen `text` with the moderation model. Fails open.
    pub async fn classify(&self, text: &str, model: &str) -> Classification {
        match self.moderate(text, model).await {
            Ok(verdict) => Classification {
                verdict,
                fault: None,
            },
            Err(e) => {
                tracing::debug!(model, "Content safety check failed, allowing message: {}", e);
                Classification {
                    verdict: Verdict::Safe,
                    fault: Some(e),
                }
            }
        }
    }

    /// The raw moderation round-trip, with faults as errors.
    pub async fn moderate(&self, text: &str, model: &str) -> Result<Verdict, ChatError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![Message::user(text)],
            max_tokens: Some(CLASSIFIER_MAX_TOKENS),
            temperature: Some(CLASSIFIER_TEMPERATURE),
        };

        let response = self.provider.chat(request).await?;
        tracing::debug!(model, reply = %response.content.trim(), "moderation reply");

        Ok(match hazard::scan(&response.content, self.policy) {
            Some(h) => Verdict::Unsafe(h),
            None => Verdict::Safe,
        })
    }
}
