//! Timed quiz: wraps [`Quiz`] with a one-second countdown task.
//!
//! The countdown is a spawned tokio task owned by a guard. The guard aborts it on
//! manual submit, on restart, and when the `TimedQuiz` is dropped, so no tick can
//! ever land on a stale or absent session. Each tick also checks the session epoch.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::quiz::questions::ChoiceKey;
use crate::quiz::session::{Quiz, QuizPhase, QuizResult, QuizSession, TickOutcome};
use crate::quiz::QuizError;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Snapshot published after every state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizStatus {
    pub phase: QuizPhase,
    pub remaining_seconds: u32,
}

/// Aborts the countdown task when dropped.
struct Countdown {
    handle: JoinHandle<()>,
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct TimedQuiz {
    quiz: Arc<Mutex<Quiz>>,
    countdown: Option<Countdown>,
    status: Arc<watch::Sender<QuizStatus>>,
}

impl Default for TimedQuiz {
    fn default() -> Self {
        Self::new()
    }
}

impl TimedQuiz {
    pub fn new() -> Self {
        let (status, _) = watch::channel(QuizStatus {
            phase: QuizPhase::NotStarted,
            remaining_seconds: 0,
        });
        Self {
            quiz: Arc::new(Mutex::new(Quiz::default())),
            countdown: None,
            status: Arc::new(status),
        }
    }

    /// Receives a new [`QuizStatus`] on every tick, answer-independent transition and expiry.
    pub fn subscribe(&self) -> watch::Receiver<QuizStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> QuizStatus {
        status_of(&self.quiz.lock())
    }

    /// Starts a fresh session and its countdown. Must run inside a tokio runtime.
    pub fn start(&mut self) -> Result<(), QuizError> {
        self.start_with(&mut rand::thread_rng())
    }

    pub fn start_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        // Cancel the old countdown before the new session exists.
        self.countdown = None;
        let (epoch, status) = {
            let mut quiz = self.quiz.lock();
            let epoch = quiz.start_with(rng)?;
            (epoch, status_of(&quiz))
        };
        self.status.send_replace(status);
        self.countdown = Some(spawn_countdown(
            Arc::clone(&self.quiz),
            epoch,
            Arc::clone(&self.status),
        ));
        Ok(())
    }

    pub fn select_answer(&self, question_id: u32, key: ChoiceKey) -> Result<(), QuizError> {
        self.quiz.lock().select_answer(question_id, key)
    }

    /// Submits and stops the countdown. Idempotent once submitted.
    pub fn submit(&mut self) -> Result<QuizResult, QuizError> {
        self.countdown = None;
        let (result, status) = {
            let mut quiz = self.quiz.lock();
            let result = quiz.submit()?;
            (result, status_of(&quiz))
        };
        self.status.send_replace(status);
        Ok(result)
    }

    /// Runs `f` against the current session, if any.
    pub fn with_session<T>(&self, f: impl FnOnce(&QuizSession) -> T) -> Option<T> {
        self.quiz.lock().session().map(f)
    }
}

fn status_of(quiz: &Quiz) -> QuizStatus {
    QuizStatus {
        phase: quiz.phase(),
        remaining_seconds: quiz.session().map(|s| s.remaining_seconds()).unwrap_or(0),
    }
}

fn spawn_countdown(
    quiz: Arc<Mutex<Quiz>>,
    epoch: u64,
    status: Arc<watch::Sender<QuizStatus>>,
) -> Countdown {
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        loop {
            ticker.tick().await;

            let (outcome, snapshot) = {
                let mut quiz = quiz.lock();
                if quiz.epoch() != epoch {
                    debug!("Countdown for session {epoch} outlived its session");
                    return;
                }
                let outcome = quiz.tick();
                (outcome, status_of(&quiz))
            };

            match outcome {
                TickOutcome::Counting(remaining) => {
                    if remaining % 60 == 0 {
                        debug!("Quiz session {epoch}: {remaining}s left");
                    }
                    status.send_replace(snapshot);
                }
                TickOutcome::Expired(result) => {
                    info!(
                        "Quiz session {epoch} timed out: {}/{}",
                        result.score, result.total
                    );
                    status.send_replace(snapshot);
                    return;
                }
                TickOutcome::Stopped => return,
            }
        }
    });
    Countdown { handle }
}
