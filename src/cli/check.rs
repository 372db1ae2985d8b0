// src/cli/check.rs - One-shot moderation of a piece of text

use std::sync::Arc;

use crate::core::hazard::{self, HazardMatch};
use crate::core::safety::{SafetyClassifier, Verdict};
use crate::provider::ModelProvider;

/// Screen `text` and print the verdict. A failed check is reported and
/// treated as safe, the same way the chat loop treats it.
pub async fn run_check(
    provider: Arc<dyn ModelProvider>,
    safety_model: &str,
    policy: HazardMatch,
    text: &str,
) -> anyhow::Result<()> {
    let classifier = SafetyClassifier::new(provider, policy);
    let classification = classifier.classify(text, safety_model).await;

    if let Some(ref fault) = classification.fault {
        eprintln!("[error] Content safety check failed: {fault}");
    }
    println!("{}", verdict_line(classification.verdict));
    Ok(())
}

fn verdict_line(verdict: Verdict) -> String {
    match verdict {
        Verdict::Safe => "safe".to_string(),
        Verdict::Unsafe(h) => format!("unsafe: {}", hazard::warning_message(h)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_line() {
        assert_eq!(verdict_line(Verdict::Safe), "safe");
        let h = hazard::lookup("S7").unwrap();
        assert_eq!(
            verdict_line(Verdict::Unsafe(h)),
            "unsafe: Warning: Unsafe content detected. Hazard: S7 - Privacy"
        );
    }
}
