use std::path::Path;

use crossterm::style::Stylize;
use serde::Serialize;

use crate::commands::Outcome;
use crate::errors::AppError;
use crate::ingest::read_document;
use crate::state::AppState;
use crate::store::KeyValueStore;

const PREVIEW_LINES: usize = 3;

#[derive(Debug, Serialize)]
struct ProfileView<'a> {
    location: Option<String>,
    target_role: &'a str,
    resume: &'a str,
    sample_resume: bool,
}

pub fn show<S: KeyValueStore>(state: &AppState<S>) -> Result<Outcome, AppError> {
    let profile = &state.profile;
    let view = ProfileView {
        location: profile
            .store()
            .location()
            .map(|p| p.display().to_string()),
        target_role: profile.target_role(),
        resume: profile.resume(),
        sample_resume: profile.is_sample_resume(),
    };

    if state.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(Outcome::Done);
    }

    if let Some(location) = &view.location {
        println!("{} {}", "Profile:".dark_grey(), location);
    }
    let role = if view.target_role.is_empty() {
        "(not set)"
    } else {
        view.target_role
    };
    println!("{} {}", "Target role:".bold(), role);

    let label = if view.sample_resume {
        "Resume (built-in sample):"
    } else {
        "Resume:"
    };
    println!(
        "{} {} chars",
        label.bold(),
        view.resume.chars().count()
    );
    for line in resume_preview(view.resume) {
        println!("  {line}");
    }
    Ok(Outcome::Done)
}

pub fn set_resume<S: KeyValueStore>(
    state: &mut AppState<S>,
    file: &Path,
) -> Result<Outcome, AppError> {
    let text = read_document(file)?;
    state.profile.set_resume(text)?;
    println!("Resume saved from {}", file.display());
    Ok(Outcome::Done)
}

pub fn set_role<S: KeyValueStore>(state: &mut AppState<S>, role: &str) -> Result<Outcome, AppError> {
    state.profile.set_target_role(role.trim())?;
    println!("Target role saved");
    Ok(Outcome::Done)
}

pub fn clear<S: KeyValueStore>(state: &mut AppState<S>) -> Result<Outcome, AppError> {
    state.profile.clear()?;
    println!("Profile cleared");
    Ok(Outcome::Done)
}

fn resume_preview(resume: &str) -> impl Iterator<Item = &str> {
    resume
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(PREVIEW_LINES)
}
