// src/core/conversation.rs - Safety-gated conversation loop
//
// One turn: screen input -> (warn | generate -> screen reply) -> record -> badges.
// Every external fault is converted here; nothing escapes `turn()` as an error.

use std::sync::Arc;

use super::badges::{self, BadgeTrigger};
use super::hazard::{self, HazardRecord};
use super::safety::{SafetyClassifier, Verdict};
use super::session::SessionState;
use super::system_prompt;
use super::types::{ChatEvent, Direction, TurnKind, TurnOutcome, TurnReport, TurnStage};
use crate::infra::config::Config;
use crate::provider::{ChatRequest, Message, ModelProvider};

pub struct Conversation {
    provider: Arc<dyn ModelProvider>,
    classifier: SafetyClassifier,
    system_prompt: String,
    on_event: Option<Box<dyn Fn(ChatEvent) + Send + Sync>>,
}

impl Conversation {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        classifier: SafetyClassifier,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            classifier,
            system_prompt: system_prompt.into(),
            on_event: None,
        }
    }

    /// One provider for both generation and moderation, persona from config.
    pub fn from_config(provider: Arc<dyn ModelProvider>, config: &Config) -> Self {
        let classifier = SafetyClassifier::new(provider.clone(), config.safety.hazard_match);
        Self::new(
            provider,
            classifier,
            system_prompt::build_system_prompt(&config.persona),
        )
    }

    /// Set a sink that receives every `ChatEvent` as it happens.
    pub fn with_events(mut self, cb: impl Fn(ChatEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(cb));
        self
    }

    pub fn classifier(&self) -> &SafetyClassifier {
        &self.classifier
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn emit(&self, events: &mut Vec<ChatEvent>, event: ChatEvent) {
        if let Some(ref cb) = self.on_event {
            cb(event.clone());
        }
        events.push(event);
    }

    /// Process one user turn start to finish.
    pub async fn turn(&self, session: &mut SessionState, input: &str, kind: TurnKind) -> TurnReport {
        if input.trim().is_empty() {
            tracing::trace!(session = %session.id, stage = ?TurnStage::Idle, "empty input");
            return TurnReport::idle();
        }

        let mut events = Vec::new();
        tracing::debug!(session = %session.id, stage = ?TurnStage::InputReceived, ?kind);

        let verdict = self
            .screen(session, input, Direction::Input, &mut events)
            .await;
        tracing::debug!(session = %session.id, stage = ?TurnStage::InputClassified, ?verdict);

        let outcome = match verdict {
            Verdict::Unsafe(hazard) => Self::record_blocked(session, input, hazard),
            Verdict::Safe => self.answer(session, input, kind, &mut events).await,
        };

        session.turns += 1;
        session.badges.advance(BadgeTrigger::CompletedTurn);
        let badges_earned = badges::evaluate(&mut session.badges);
        for name in &badges_earned {
            let metric = session
                .badges
                .get(name)
                .map(|b| b.metric())
                .unwrap_or(badges::ProgressMetric::Count);
            tracing::info!(session = %session.id, badge = %name, "badge earned");
            self.emit(
                &mut events,
                ChatEvent::BadgeEarned {
                    name: name.clone(),
                    metric,
                },
            );
        }
        tracing::debug!(
            session = %session.id,
            stage = ?TurnStage::Recorded,
            transcript_len = session.transcript.len()
        );

        TurnReport {
            outcome,
            events,
            badges_earned,
        }
    }

    /// Classify one message and report hazards and faults as events.
    async fn screen(
        &self,
        session: &SessionState,
        text: &str,
        direction: Direction,
        events: &mut Vec<ChatEvent>,
    ) -> Verdict {
        let classification = self.classifier.classify(text, &session.safety_model).await;
        if let Some(fault) = classification.fault {
            self.emit(
                events,
                ChatEvent::ClassifierFault {
                    direction,
                    message: fault.to_string(),
                },
            );
        }
        if let Verdict::Unsafe(hazard) = classification.verdict {
            tracing::info!(session = %session.id, %direction, code = hazard.code, "hazard detected");
            self.emit(events, ChatEvent::HazardDetected { direction, hazard });
        }
        classification.verdict
    }

    fn record_blocked(
        session: &mut SessionState,
        input: &str,
        hazard: &'static HazardRecord,
    ) -> TurnOutcome {
        tracing::debug!(session = %session.id, stage = ?TurnStage::Blocked, code = hazard.code);
        let warning = hazard::warning_message(hazard);
        session.transcript.push(Message::user(input));
        session.transcript.push(Message::assistant(warning.clone()));
        session.blocked_turns += 1;
        TurnOutcome::Blocked { hazard, warning }
    }

    async fn answer(
        &self,
        session: &mut SessionState,
        input: &str,
        kind: TurnKind,
        events: &mut Vec<ChatEvent>,
    ) -> TurnOutcome {
        session.badges.advance(BadgeTrigger::SafeQuestion);
        session.transcript.push(Message::user(input));

        let mut messages = Vec::with_capacity(session.transcript.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(session.transcript.iter().cloned());
        let request = ChatRequest {
            model: session.conversational_model.clone(),
            messages,
            ..Default::default()
        };
        tracing::debug!(
            session = %session.id,
            stage = ?TurnStage::GenerationRequested,
            model = %request.model
        );

        let response = match self.provider.chat(request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(session = %session.id, "Generation failed: {}", e);
                let message = e.to_string();
                self.emit(
                    events,
                    ChatEvent::GenerationFault {
                        message: message.clone(),
                    },
                );
                return TurnOutcome::GenerationFailed { message };
            }
        };
        tracing::debug!(
            session = %session.id,
            tokens = response.usage.total(),
            "reply received"
        );

        let verdict = self
            .screen(session, &response.content, Direction::Output, events)
            .await;
        tracing::debug!(session = %session.id, stage = ?TurnStage::OutputClassified, ?verdict);

        // A flagged reply is dropped here and never stored.
        let (reply, filtered) = match verdict {
            Verdict::Safe => (response.content, None),
            Verdict::Unsafe(hazard) => {
                session.filtered_replies += 1;
                (hazard::warning_message(hazard), Some(hazard))
            }
        };
        session.transcript.push(Message::assistant(reply.clone()));

        if kind == TurnKind::Quiz && filtered.is_none() {
            session.badges.advance(BadgeTrigger::Quiz);
        }

        TurnOutcome::Answered { reply, filtered }
    }
}
