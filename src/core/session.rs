// src/core/session.rs - Per-session conversation state

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::badges::BadgeBook;
use crate::provider::Message;

/// Append-only, chronological record of the conversation.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Everything one chat session owns. Never shared between sessions.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub transcript: Transcript,
    pub badges: BadgeBook,
    pub conversational_model: String,
    pub safety_model: String,
    /// Non-idle turns processed.
    pub turns: u32,
    /// Turns whose input was flagged.
    pub blocked_turns: u32,
    /// Replies replaced with a warning.
    pub filtered_replies: u32,
}

impl SessionState {
    pub fn new(conversational_model: impl Into<String>, safety_model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            transcript: Transcript::default(),
            badges: BadgeBook::default(),
            conversational_model: conversational_model.into(),
            safety_model: safety_model.into(),
            turns: 0,
            blocked_turns: 0,
            filtered_replies: 0,
        }
    }

    pub fn with_badges(mut self, badges: BadgeBook) -> Self {
        self.badges = badges;
        self
    }

    pub fn set_conversational_model(&mut self, model: impl Into<String>) {
        self.conversational_model = model.into();
    }

    pub fn set_safety_model(&mut self, model: impl Into<String>) {
        self.safety_model = model.into();
    }

    /// Whole minutes since the session started.
    pub fn elapsed_minutes(&self) -> i64 {
        (Utc::now() - self.started_at).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;

    #[test]
    fn test_new_session_is_empty() {
        let s = SessionState::new("chat-model", "guard-model");
        assert!(s.transcript.is_empty());
        assert_eq!(s.badges.earned_count(), 0);
        assert_eq!(s.conversational_model, "chat-model");
        assert_eq!(s.safety_model, "guard-model");
        assert_eq!(s.turns, 0);
        assert!(!s.id.is_empty());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = SessionState::new("m", "g");
        let b = SessionState::new("m", "g");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_transcript_keeps_order() {
        let mut t = Transcript::default();
        t.push(Message::user("first"));
        t.push(Message::assistant("second"));
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages()[0].content, "first");
        assert_eq!(t.last().unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_model_overrides() {
        let mut s = SessionState::new("m", "g");
        s.set_conversational_model("m2");
        s.set_safety_model("g2");
        assert_eq!(s.conversational_model, "m2");
        assert_eq!(s.safety_model, "g2");
    }
}
