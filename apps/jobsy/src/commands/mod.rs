//! Command-line surface.
//!
//! `match`, `roadmap` and `interview` submit through the orchestrator and print the
//! rendered response; `quiz` runs the interactive timed quiz; `profile` edits the
//! persisted resume and target role.

mod ai;
mod profile;
mod quiz;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::KeyValueStore;

const VALIDATION_EXIT_CODE: u8 = 2;
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Parser)]
#[command(name = "jobsy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI career accelerator: resume match, career roadmap, interview prep and an aptitude quiz", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score your resume against a job description
    Match {
        /// Resume file (text or PDF). Saved to your profile.
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Job description file (text or PDF). Defaults to the built-in sample.
        #[arg(short, long)]
        job: Option<PathBuf>,
    },

    /// Generate a 12-month learning roadmap for a target role
    Roadmap {
        /// Target role. Saved to your profile.
        #[arg(long)]
        role: Option<String>,
    },

    /// Generate an interview preparation guide for a role
    Interview {
        /// Role to prepare for. Saved to your profile.
        #[arg(long)]
        role: Option<String>,
    },

    /// Take the timed aptitude quiz
    Quiz,

    /// Show or edit the saved profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the saved resume and target role
    Show,
    /// Replace the saved resume with a file's contents (text or PDF)
    SetResume { file: PathBuf },
    /// Set the saved target role
    SetRole { role: String },
    /// Forget the saved resume and role
    Clear,
}

/// How a command ended, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Input was rejected before any request was made.
    Rejected,
    /// The collaborator call failed.
    Failed,
    /// Interrupted while a request was in flight.
    Cancelled,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(VALIDATION_EXIT_CODE),
            Outcome::Failed => ExitCode::FAILURE,
            Outcome::Cancelled => ExitCode::from(INTERRUPTED_EXIT_CODE),
        }
    }
}

pub async fn dispatch<S: KeyValueStore>(
    state: &mut AppState<S>,
    command: Commands,
) -> Result<Outcome, AppError> {
    match command {
        Commands::Match { resume, job } => {
            ai::run_match(state, resume.as_deref(), job.as_deref()).await
        }
        Commands::Roadmap { role } => ai::run_roadmap(state, role).await,
        Commands::Interview { role } => ai::run_interview(state, role).await,
        Commands::Quiz => quiz::run_quiz().await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => profile::show(state),
            ProfileAction::SetResume { file } => profile::set_resume(state, &file),
            ProfileAction::SetRole { role } => profile::set_role(state, &role),
            ProfileAction::Clear => profile::clear(state),
        },
    }
}
