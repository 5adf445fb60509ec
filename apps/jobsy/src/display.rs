//! Terminal presentation of rendered content, request failures and quiz screens.
//!
//! Everything here returns `String`s; commands decide where they are printed.

use crossterm::style::Stylize;

use crate::features::{FailureKind, RequestFailure};
use crate::quiz::session::{QuestionReview, LOW_TIME_SECONDS};
use crate::quiz::{format_remaining, ChoiceKey, QuizQuestion, QuizResult};
use crate::render::blocks::plain_text;
use crate::render::{Block, Inline, ListItem, ListMarker, RenderedContent, ScoreBanner, Tier};

const GROUNDING_HEADER: &str = "INFORMATION GROUNDING";
const BANNER_LABEL: &str = "COMPATIBILITY METRIC";

pub fn format_content(content: &RenderedContent) -> String {
    let mut out = String::new();
    for block in &content.blocks {
        out.push_str(&format_block(block));
        out.push('\n');
    }
    if !content.citations.is_empty() {
        out.push('\n');
        out.push_str(&GROUNDING_HEADER.dark_grey().bold().to_string());
        out.push('\n');
        for citation in &content.citations {
            out.push_str(&format!(
                "  {} {} {}\n",
                "●".green(),
                citation.title.as_str().bold(),
                format!("<{}>", citation.uri).dark_grey()
            ));
        }
    }
    out
}

fn format_block(block: &Block) -> String {
    match block {
        Block::ScoreBanner(banner) => format_banner(banner),
        Block::Heading { level, content } => {
            // Heading text is already bold; emphasis runs are flattened.
            let text = plain_text(content);
            match *level {
                1 => format!("{}\n", text.to_uppercase().bold()),
                2 => format!("{}\n{}\n", text.as_str().bold(), "─".repeat(40).dark_grey()),
                _ => format!("{}\n", text.as_str().bold().underlined()),
            }
        }
        Block::List { items } => items.iter().map(format_item).collect(),
        Block::Paragraph { content } => format!("{}\n", format_inline(content)),
    }
}

fn format_banner(banner: &ScoreBanner) -> String {
    let percent = format!("{}%", banner.percent);
    let percent = match banner.tier {
        Tier::Strong => percent.green(),
        Tier::Moderate => percent.yellow(),
        Tier::Weak => percent.red(),
    };
    format!(
        "{}\n  {}\n  {}\n",
        BANNER_LABEL.dark_grey(),
        percent.bold(),
        banner.caption()
    )
}

fn format_item(item: &ListItem) -> String {
    let glyph = match item.marker {
        ListMarker::Star => item.marker.glyph().green(),
        ListMarker::Dash => item.marker.glyph().dark_grey(),
    };
    format!("  {} {}\n", glyph, format_inline(&item.content))
}

fn format_inline(runs: &[Inline]) -> String {
    runs.iter()
        .map(|run| match run {
            Inline::Text(text) => text.clone(),
            Inline::Emphasis(text) => text.as_str().bold().to_string(),
            Inline::SoftBreak => "\n".to_string(),
        })
        .collect()
}

pub fn format_failure(failure: &RequestFailure) -> String {
    match failure.kind {
        FailureKind::Validation => format!("{} {}", "!".yellow().bold(), failure.message),
        FailureKind::Collaborator => {
            format!("{} {}", "✖".red().bold(), failure.message.as_str().red())
        }
    }
}

/// Countdown label, highlighted in the last minute.
pub fn format_countdown(remaining_seconds: u32) -> String {
    let label = format!("⏱ {}", format_remaining(remaining_seconds));
    if remaining_seconds < LOW_TIME_SECONDS {
        label.red().bold().to_string()
    } else {
        label.green().to_string()
    }
}

pub fn format_question(number: usize, question: &QuizQuestion, chosen: Option<ChoiceKey>) -> String {
    let mut out = format!("{} {}\n", format!("{number}.").green().bold(), question.prompt);
    for (key, text) in question.choices() {
        let line = format!("   {key}) {text}");
        if chosen == Some(key) {
            out.push_str(&format!("{} {}\n", line.as_str().bold(), "◀".green()));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

pub fn format_result(result: &QuizResult, review: &[QuestionReview]) -> String {
    let mut out = String::new();
    if result.timed_out {
        out.push_str(&format!("{}\n", "Time is up!".red().bold()));
    }
    out.push_str(&format!(
        "{} {}\n{}\n\n",
        "Results are in!".bold(),
        format!("{} / {}", result.score, result.total).green().bold(),
        result.verdict()
    ));

    for (index, item) in review.iter().enumerate() {
        let q = &item.question;
        let mark = if item.is_correct {
            "✔".green()
        } else {
            "✘".red()
        };
        out.push_str(&format!("{mark} {}. {}\n", index + 1, q.prompt));
        let chosen = item
            .chosen
            .map(|key| format!("{key}) {}", q.option(key)))
            .unwrap_or_else(|| "no answer".to_string());
        out.push_str(&format!("   Your answer: {chosen}\n"));
        if !item.is_correct {
            out.push_str(&format!(
                "   Correct answer: {}) {}\n",
                q.correct,
                q.option(q.correct)
            ));
        }
        out.push_str(&format!("   {}\n\n", q.explanation.dark_grey()));
    }
    out
}
