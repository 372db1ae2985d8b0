// src/core/badges.rs - Engagement badges and their evaluator

use serde::{Deserialize, Serialize};

/// Which session event moves a badge forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeTrigger {
    /// A user question that passed moderation.
    SafeQuestion,
    /// A quiz turn that got an answer back.
    Quiz,
    /// Any finished turn, safe or blocked. Stands in for time spent.
    CompletedTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressMetric {
    Count,
    TimeSpent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub description: String,
    pub trigger: BadgeTrigger,
    pub progress: u32,
    pub threshold: u32,
    pub earned: bool,
}

impl Badge {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        trigger: BadgeTrigger,
        threshold: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            trigger,
            progress: 0,
            threshold,
            earned: false,
        }
    }

    pub fn metric(&self) -> ProgressMetric {
        match self.trigger {
            BadgeTrigger::CompletedTurn => ProgressMetric::TimeSpent,
            BadgeTrigger::SafeQuestion | BadgeTrigger::Quiz => ProgressMetric::Count,
        }
    }

    /// "Earned!" or "In Progress (p / t)".
    pub fn status_line(&self) -> String {
        if self.earned {
            "Earned!".to_string()
        } else {
            format!("In Progress ({} / {})", self.progress, self.threshold)
        }
    }
}

/// All badges for one session, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeBook {
    badges: Vec<Badge>,
}

impl Default for BadgeBook {
    fn default() -> Self {
        Self::new(vec![
            Badge::new("Explorer", "Ask 5 questions", BadgeTrigger::SafeQuestion, 5),
            Badge::new(
                "Question Champion",
                "Answer 10 educational questions",
                BadgeTrigger::SafeQuestion,
                10,
            ),
            Badge::new(
                "Learning Streak",
                "Spend 10 minutes with Doctor Groq",
                BadgeTrigger::CompletedTurn,
                10,
            ),
            Badge::new("Fun Seeker", "Engage in 3 fun quizzes", BadgeTrigger::Quiz, 3),
            Badge::new(
                "Knowledge Keeper",
                "Reach 15 interactions",
                BadgeTrigger::SafeQuestion,
                15,
            ),
        ])
    }
}

impl BadgeBook {
    pub fn new(badges: Vec<Badge>) -> Self {
        Self { badges }
    }

    /// Bump every badge bound to `trigger` by one. Never decreases.
    pub fn advance(&mut self, trigger: BadgeTrigger) {
        for badge in self.badges.iter_mut().filter(|b| b.trigger == trigger) {
            badge.progress = badge.progress.saturating_add(1);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }

    pub fn earned_count(&self) -> usize {
        self.badges.iter().filter(|b| b.earned).count()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

/// Mark badges whose progress reached their threshold.
///
/// Returns only the badges earned by this call. Already-earned badges are
/// skipped, so calling this twice in a row reports nothing the second time.
pub fn evaluate(book: &mut BadgeBook) -> Vec<String> {
    let mut newly_earned = Vec::new();
    for badge in book.badges.iter_mut() {
        if !badge.earned && badge.progress >= badge.threshold {
            badge.earned = true;
            newly_earned.push(badge.name.clone());
        }
    }
    newly_earned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_book() {
        let book = BadgeBook::default();
        assert_eq!(book.len(), 5);
        assert!(book.iter().all(|b| b.progress == 0 && !b.earned));
        assert_eq!(book.get("Explorer").unwrap().threshold, 5);
        assert_eq!(book.get("Fun Seeker").unwrap().trigger, BadgeTrigger::Quiz);
        assert_eq!(
            book.get("Learning Streak").unwrap().metric(),
            ProgressMetric::TimeSpent
        );
    }

    #[test]
    fn test_advance_safe_question_moves_three_badges() {
        let mut book = BadgeBook::default();
        book.advance(BadgeTrigger::SafeQuestion);
        let moved: Vec<&str> = book
            .iter()
            .filter(|b| b.progress == 1)
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(moved, vec!["Explorer", "Question Champion", "Knowledge Keeper"]);
    }

    #[test]
    fn test_explorer_threshold() {
        let mut book = BadgeBook::default();
        for _ in 0..4 {
            book.advance(BadgeTrigger::SafeQuestion);
            assert!(evaluate(&mut book).is_empty());
        }
        let explorer = book.get("Explorer").unwrap();
        assert_eq!(explorer.progress, 4);
        assert!(!explorer.earned);

        book.advance(BadgeTrigger::SafeQuestion);
        assert_eq!(evaluate(&mut book), vec!["Explorer".to_string()]);
        assert!(book.get("Explorer").unwrap().earned);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut book = BadgeBook::default();
        for _ in 0..3 {
            book.advance(BadgeTrigger::Quiz);
        }
        assert_eq!(evaluate(&mut book), vec!["Fun Seeker".to_string()]);
        let snapshot = book.clone();
        assert!(evaluate(&mut book).is_empty());
        assert_eq!(book, snapshot);
    }

    #[test]
    fn test_earned_never_reverts() {
        let mut book = BadgeBook::new(vec![Badge::new("One", "d", BadgeTrigger::Quiz, 1)]);
        book.advance(BadgeTrigger::Quiz);
        evaluate(&mut book);
        book.advance(BadgeTrigger::Quiz);
        evaluate(&mut book);
        let b = book.get("One").unwrap();
        assert!(b.earned);
        assert_eq!(b.progress, 2);
        assert_eq!(book.earned_count(), 1);
    }

    #[test]
    fn test_zero_threshold_earned_on_first_evaluation() {
        let mut book = BadgeBook::new(vec![Badge::new("Hello", "d", BadgeTrigger::Quiz, 0)]);
        assert_eq!(evaluate(&mut book), vec!["Hello".to_string()]);
    }

    #[test]
    fn test_status_line() {
        let mut b = Badge::new("Explorer", "Ask 5 questions", BadgeTrigger::SafeQuestion, 5);
        b.progress = 2;
        assert_eq!(b.status_line(), "In Progress (2 / 5)");
        b.earned = true;
        assert_eq!(b.status_line(), "Earned!");
    }
}
