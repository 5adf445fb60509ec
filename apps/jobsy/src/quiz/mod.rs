//! Aptitude quiz: a self-contained timed assessment with local scoring.
//! No dependency on the AI features.

pub mod questions;
pub mod session;
pub mod timer;

use thiserror::Error;

pub use questions::{ChoiceKey, QuizQuestion};
pub use session::{format_remaining, QuizPhase, QuizResult};
pub use timer::TimedQuiz;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("No quiz is in progress")]
    NotInProgress,

    #[error("Question {0} is not part of this session")]
    UnknownQuestion(u32),

    #[error("'{0}' is not a valid choice (use A, B, C or D)")]
    InvalidChoice(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),
}
