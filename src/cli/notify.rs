// src/cli/notify.rs - Terminal notification sink for chat events

use crate::core::badges::ProgressMetric;
use crate::core::types::ChatEvent;

/// Build a sink that writes formatted events to stderr.
///
/// Stdout carries only the conversation itself.
/// Returns a closure suitable for `Conversation::with_events()`.
pub fn terminal_notifier() -> impl Fn(ChatEvent) + Send + Sync + 'static {
    move |event| eprintln!("{}", format_event(&event))
}

pub fn format_event(event: &ChatEvent) -> String {
    match event {
        ChatEvent::ClassifierFault { direction, message } => {
            format!("[error] Content safety check failed on {direction}: {message}")
        }
        ChatEvent::GenerationFault { message } => {
            format!("[error] Doctor Groq could not answer: {message}")
        }
        ChatEvent::HazardDetected { direction, hazard } => format!(
            "[safety] {direction} flagged: {} - {}",
            hazard.code, hazard.category
        ),
        ChatEvent::BadgeEarned { name, metric } => {
            let icon = match metric {
                ProgressMetric::Count => "🎉",
                ProgressMetric::TimeSpent => "⏰",
            };
            format!("{icon} You've earned the '{name}' badge!")
        }
    }
}
