use std::path::Path;

use tracing::info;

use crate::commands::Outcome;
use crate::display;
use crate::errors::AppError;
use crate::features::{FailureKind, FeatureInput, FeatureKind, RequestState};
use crate::ingest::read_document;
use crate::models::samples::SAMPLE_JOB_DESC;
use crate::render::RenderedContent;
use crate::state::AppState;
use crate::store::KeyValueStore;

const ROLE_PLACEHOLDER: &str = "Senior Professional";

pub async fn run_match<S: KeyValueStore>(
    state: &mut AppState<S>,
    resume: Option<&Path>,
    job: Option<&Path>,
) -> Result<Outcome, AppError> {
    if let Some(path) = resume {
        state.profile.set_resume(read_document(path)?)?;
    }
    let job_description = match job {
        Some(path) => read_document(path)?,
        None => SAMPLE_JOB_DESC.to_string(),
    };
    if state.profile.is_sample_resume() {
        info!("Using the sample resume; pass --resume to analyze your own");
    }

    let input = FeatureInput::Match {
        resume: state.profile.resume().to_string(),
        job_description,
    };
    submit(state, input, None).await
}

pub async fn run_roadmap<S: KeyValueStore>(
    state: &mut AppState<S>,
    role: Option<String>,
) -> Result<Outcome, AppError> {
    remember_role(state, role)?;
    let target_role = state.profile.target_role().to_string();
    let header = format!(
        "Your personalized learning path to becoming a {}.",
        or_placeholder(&target_role)
    );
    submit(state, FeatureInput::Roadmap { target_role }, Some(header)).await
}

pub async fn run_interview<S: KeyValueStore>(
    state: &mut AppState<S>,
    role: Option<String>,
) -> Result<Outcome, AppError> {
    remember_role(state, role)?;
    let role = state.profile.target_role().to_string();
    let header = format!("Interview preparation for {}.", or_placeholder(&role));
    submit(state, FeatureInput::Interview { role }, Some(header)).await
}

/// Roadmap and interview share the one persisted role.
fn remember_role<S: KeyValueStore>(
    state: &mut AppState<S>,
    role: Option<String>,
) -> Result<(), AppError> {
    match role {
        Some(role) => state.profile.set_target_role(role.trim()),
        None => Ok(()),
    }
}

fn or_placeholder(role: &str) -> &str {
    if role.trim().is_empty() {
        ROLE_PLACEHOLDER
    } else {
        role
    }
}

async fn submit<S: KeyValueStore>(
    state: &AppState<S>,
    input: FeatureInput,
    header: Option<String>,
) -> Result<Outcome, AppError> {
    let kind = input.kind();
    if !state.json {
        eprintln!("{}", loading_message(kind));
    }

    let outcome = tokio::select! {
        outcome = state.orchestrator.submit(input) => outcome,
        _ = tokio::signal::ctrl_c() => {
            if state.orchestrator.state(kind).is_loading() {
                state.orchestrator.reset(kind);
            }
            info!("{kind} request cancelled");
            return Ok(Outcome::Cancelled);
        }
    };

    match outcome {
        RequestState::Succeeded(response) => {
            let content = RenderedContent::from_response(&response);
            if state.json {
                println!("{}", serde_json::to_string_pretty(&content)?);
            } else {
                if let Some(header) = header {
                    println!("{header}\n");
                }
                print!("{}", display::format_content(&content));
            }
            Ok(Outcome::Done)
        }
        RequestState::Failed(failure) => {
            if state.json {
                println!("{}", serde_json::to_string_pretty(&failure)?);
            } else {
                eprintln!("{}", display::format_failure(&failure));
            }
            Ok(match failure.kind {
                FailureKind::Validation => Outcome::Rejected,
                FailureKind::Collaborator => Outcome::Failed,
            })
        }
        other => Err(AppError::Internal(anyhow::anyhow!(
            "{kind} request finished in state {other:?}"
        ))),
    }
}

fn loading_message(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Match => "Analyzing your resume against the role...",
        FeatureKind::Roadmap => "Mapping your path with live market data...",
        FeatureKind::Interview => "Researching interview questions...",
    }
}
