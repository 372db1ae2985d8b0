// src/core/types.rs - Turn lifecycle types shared by the loop and the CLI

use super::badges::ProgressMetric;
use super::hazard::HazardRecord;

/// What the user asked for this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnKind {
    #[default]
    Question,
    Quiz,
}

/// Stages of one turn, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Idle,
    InputReceived,
    InputClassified,
    Blocked,
    GenerationRequested,
    OutputClassified,
    Recorded,
}

/// Which side of the conversation was screened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "reply"),
        }
    }
}

/// Notifications raised while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// The moderation call failed; the text was let through.
    ClassifierFault { direction: Direction, message: String },
    /// The conversational model failed; the turn has no answer.
    GenerationFault { message: String },
    HazardDetected {
        direction: Direction,
        hazard: &'static HazardRecord,
    },
    BadgeEarned { name: String, metric: ProgressMetric },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Nothing to do (blank input).
    Idle,
    /// The user's text was flagged; `warning` was recorded as the answer.
    Blocked {
        hazard: &'static HazardRecord,
        warning: String,
    },
    /// The model answered. `filtered` is set when the reply was replaced.
    Answered {
        reply: String,
        filtered: Option<&'static HazardRecord>,
    },
    /// The user turn was recorded but the model call failed.
    GenerationFailed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub events: Vec<ChatEvent>,
    pub badges_earned: Vec<String>,
}

impl TurnReport {
    pub fn idle() -> Self {
        Self {
            outcome: TurnOutcome::Idle,
            events: Vec::new(),
            badges_earned: Vec::new(),
        }
    }

    /// The assistant text to display, if the turn produced one.
    pub fn display_text(&self) -> Option<&str> {
        match &self.outcome {
            TurnOutcome::Blocked { warning, .. } => Some(warning),
            TurnOutcome::Answered { reply, .. } => Some(reply),
            TurnOutcome::Idle | TurnOutcome::GenerationFailed { .. } => None,
        }
    }
}
