//! Quiz state machine: NotStarted → InProgress → Submitted.
//!
//! Pure and synchronous. The one-second countdown lives in `quiz::timer`,
//! which calls [`Quiz::tick`].

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::quiz::questions::{ChoiceKey, QuizQuestion, QUESTION_POOL};
use crate::quiz::QuizError;

pub const SESSION_SIZE: usize = 5;
pub const SESSION_SECONDS: u32 = 600;
/// Below this the countdown is shown as running out.
pub const LOW_TIME_SECONDS: u32 = 60;

const _: () = assert!(QUESTION_POOL.len() >= SESSION_SIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    NotStarted,
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    /// True when the countdown, not the user, ended the session.
    pub timed_out: bool,
}

impl QuizResult {
    pub fn verdict(&self) -> &'static str {
        if self.score == self.total {
            "Perfect score! You're ready for any challenge."
        } else if self.score >= 3 {
            "Solid performance! Just a few areas to polish."
        } else {
            "Great practice! Keep refining your skills."
        }
    }
}

/// What one countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running; seconds left.
    Counting(u32),
    /// Reached zero and auto-submitted.
    Expired(QuizResult),
    /// No session in progress; the countdown should stop.
    Stopped,
}

/// One question as shown after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionReview {
    pub question: QuizQuestion,
    pub chosen: Option<ChoiceKey>,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    answers: HashMap<u32, ChoiceKey>,
    remaining_seconds: u32,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Requires exactly [`SESSION_SIZE`] questions with distinct ids.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        let distinct: HashSet<u32> = questions.iter().map(|q| q.id).collect();
        if questions.len() != SESSION_SIZE || distinct.len() != SESSION_SIZE {
            return Err(QuizError::InvalidSession(format!(
                "expected {SESSION_SIZE} distinct questions, got {} ({} distinct)",
                questions.len(),
                distinct.len()
            )));
        }
        Ok(Self {
            questions,
            answers: HashMap::new(),
            remaining_seconds: SESSION_SECONDS,
            result: None,
        })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answer(&self, question_id: u32) -> Option<ChoiceKey> {
        self.answers.get(&question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    /// Records or overwrites the answer for a question. Rejected once submitted.
    pub fn select_answer(&mut self, question_id: u32, key: ChoiceKey) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::NotInProgress);
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(QuizError::UnknownQuestion(question_id));
        }
        self.answers.insert(question_id, key);
        Ok(())
    }

    /// Decrements the countdown by one second; at zero the session submits itself.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::Stopped;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return TickOutcome::Expired(self.finish(true));
        }
        TickOutcome::Counting(self.remaining_seconds)
    }

    /// Freezes the session and scores it. Repeated calls return the first result.
    pub fn submit(&mut self) -> QuizResult {
        self.finish(false)
    }

    fn finish(&mut self, timed_out: bool) -> QuizResult {
        if let Some(result) = self.result {
            return result;
        }
        let result = QuizResult {
            score: self.score(),
            total: self.questions.len(),
            timed_out,
        };
        info!(
            "Quiz submitted: {}/{} (timed out: {timed_out})",
            result.score, result.total
        );
        self.result = Some(result);
        result
    }

    /// Unanswered questions count as wrong; no partial credit.
    fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answer(q.id) == Some(q.correct))
            .count()
    }

    pub fn review(&self) -> Vec<QuestionReview> {
        self.questions
            .iter()
            .map(|q| {
                let chosen = self.answer(q.id);
                QuestionReview {
                    question: *q,
                    chosen,
                    is_correct: chosen == Some(q.correct),
                }
            })
            .collect()
    }
}

/// Owns at most one session. Starting again discards the previous one entirely.
#[derive(Debug, Default)]
pub struct Quiz {
    session: Option<QuizSession>,
    /// Bumped on every start so a countdown can tell it belongs to an old session.
    epoch: u64,
}

impl Quiz {
    pub fn phase(&self) -> QuizPhase {
        match &self.session {
            None => QuizPhase::NotStarted,
            Some(session) if session.is_submitted() => QuizPhase::Submitted,
            Some(_) => QuizPhase::InProgress,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Draws [`SESSION_SIZE`] distinct questions and resets answers and timer.
    pub fn start_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u64, QuizError> {
        let questions: Vec<QuizQuestion> = QUESTION_POOL
            .choose_multiple(rng, SESSION_SIZE)
            .copied()
            .collect();
        self.session = Some(QuizSession::new(questions)?);
        self.epoch += 1;
        info!("Quiz session {} started", self.epoch);
        Ok(self.epoch)
    }

    pub fn select_answer(&mut self, question_id: u32, key: ChoiceKey) -> Result<(), QuizError> {
        self.session
            .as_mut()
            .ok_or(QuizError::NotInProgress)?
            .select_answer(question_id, key)
    }

    pub fn tick(&mut self) -> TickOutcome {
        match self.session.as_mut() {
            Some(session) => session.tick(),
            None => TickOutcome::Stopped,
        }
    }

    /// Valid once a session exists; idempotent after the first call.
    pub fn submit(&mut self) -> Result<QuizResult, QuizError> {
        self.session
            .as_mut()
            .map(QuizSession::submit)
            .ok_or(QuizError::NotInProgress)
    }
}

/// `m:ss`, e.g. `9:05`.
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
