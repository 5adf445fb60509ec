//! Interactive quiz loop. Answers arrive as lines on stdin while the countdown
//! runs on its own task; whichever ends the session first wins.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::commands::Outcome;
use crate::display;
use crate::errors::AppError;
use crate::quiz::session::{LOW_TIME_SECONDS, SESSION_SECONDS, SESSION_SIZE};
use crate::quiz::{ChoiceKey, QuizPhase, QuizResult, TimedQuiz};

#[derive(Debug, PartialEq, Eq)]
enum QuizInput {
    Answer { number: usize, key: ChoiceKey },
    Show,
    Submit,
    Quit,
    Invalid(String),
}

pub async fn run_quiz() -> Result<Outcome, AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quiz = TimedQuiz::new();

    loop {
        quiz.start()?;
        print_intro();

        let Some(result) = play_session(&mut quiz, &mut lines).await? else {
            println!("Quiz abandoned.");
            return Ok(Outcome::Done);
        };
        let review = quiz.with_session(|s| s.review()).unwrap_or_default();
        println!("\n{}", display::format_result(&result, &review));

        println!("Type 'retry' for a new set of questions, or press Enter to finish.");
        match lines.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("retry") => continue,
            _ => return Ok(Outcome::Done),
        }
    }
}

fn print_intro() {
    println!(
        "Aptitude quiz: {SESSION_SIZE} questions, {} minutes.",
        SESSION_SECONDS / 60
    );
    println!("Answer with '<number> <letter>' (e.g. '2 b'). 'show' lists the questions, 'submit' finishes, 'quit' abandons.\n");
}

/// Runs one session to completion. `None` means the user quit.
async fn play_session<R>(
    quiz: &mut TimedQuiz,
    lines: &mut Lines<R>,
) -> Result<Option<QuizResult>, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut status = quiz.subscribe();
    let mut warned = false;
    print_questions(quiz);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                // End of input submits what has been answered so far.
                let Some(line) = line? else {
                    return Ok(Some(quiz.submit()?));
                };
                match parse_input(&line) {
                    QuizInput::Answer { number, key } => record_answer(quiz, number, key),
                    QuizInput::Show => print_questions(quiz),
                    QuizInput::Submit => return Ok(Some(quiz.submit()?)),
                    QuizInput::Quit => return Ok(None),
                    QuizInput::Invalid(message) => println!("{message}"),
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    return Ok(quiz.with_session(|s| s.result()).flatten());
                }
                let snapshot = *status.borrow_and_update();
                if snapshot.phase == QuizPhase::Submitted {
                    debug!("Session ended by the countdown");
                    return Ok(quiz.with_session(|s| s.result()).flatten());
                }
                if !warned && snapshot.remaining_seconds < LOW_TIME_SECONDS {
                    warned = true;
                    println!("{} remaining!", display::format_countdown(snapshot.remaining_seconds));
                }
            }
        }
    }
}

fn record_answer(quiz: &TimedQuiz, number: usize, key: ChoiceKey) {
    let id = quiz
        .with_session(|s| s.questions().get(number.wrapping_sub(1)).map(|q| q.id))
        .flatten();
    let Some(id) = id else {
        println!("There is no question {number}.");
        return;
    };
    match quiz.select_answer(id, key) {
        Ok(()) => {
            let status = quiz.status();
            let answered = quiz.with_session(|s| s.answered_count()).unwrap_or(0);
            println!(
                "Question {number}: {key} ({answered}/{SESSION_SIZE} answered, {})",
                display::format_countdown(status.remaining_seconds)
            );
        }
        Err(e) => println!("{e}"),
    }
}

fn print_questions(quiz: &TimedQuiz) {
    let status = quiz.status();
    quiz.with_session(|session| {
        println!("{}\n", display::format_countdown(status.remaining_seconds));
        for (index, question) in session.questions().iter().enumerate() {
            println!(
                "{}",
                display::format_question(index + 1, question, session.answer(question.id))
            );
        }
    });
}

fn parse_input(line: &str) -> QuizInput {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "show" | "list" => return QuizInput::Show,
        "submit" | "done" => return QuizInput::Submit,
        "quit" | "q" | "exit" => return QuizInput::Quit,
        _ => {}
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    let Ok(number) = line[..digits].parse::<usize>() else {
        return QuizInput::Invalid(format!(
            "Could not read '{line}'. Try something like '2 b'."
        ));
    };
    let letter = line[digits..].trim_start_matches([' ', ':', '.', ')']);
    match letter.parse::<ChoiceKey>() {
        Ok(key) => QuizInput::Answer { number, key },
        Err(e) => QuizInput::Invalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started() -> TimedQuiz {
        let mut quiz = TimedQuiz::new();
        quiz.start_with(&mut StdRng::seed_from_u64(11)).unwrap();
        quiz
    }

    #[test]
    fn test_parse_answer_forms() {
        for raw in ["2 b", "2b", "2: B", " 2) b "] {
            assert_eq!(
                parse_input(raw),
                QuizInput::Answer {
                    number: 2,
                    key: ChoiceKey::B
                },
                "{raw}"
            );
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("SUBMIT"), QuizInput::Submit);
        assert_eq!(parse_input("show"), QuizInput::Show);
        assert_eq!(parse_input("q"), QuizInput::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_letter_and_missing_number() {
        assert!(matches!(parse_input("3 e"), QuizInput::Invalid(_)));
        assert!(matches!(parse_input("b"), QuizInput::Invalid(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_answers_then_submit() {
        let mut quiz = started();
        let correct = quiz.with_session(|s| s.questions()[0].correct).unwrap();
        let script = format!("1 {correct}\n9 a\nsubmit\n");
        let mut lines = BufReader::new(script.as_bytes()).lines();

        let result = play_session(&mut quiz, &mut lines).await.unwrap().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total, SESSION_SIZE);
        assert!(!result.timed_out);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_returns_none() {
        let mut quiz = started();
        let mut lines = BufReader::new(&b"quit\n"[..]).lines();
        assert_eq!(play_session(&mut quiz, &mut lines).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_user_times_out() {
        let mut quiz = started();
        // Keep the writer alive so input never ends.
        let (_writer, reader) = tokio::io::duplex(64);
        let mut lines = BufReader::new(reader).lines();

        let result = tokio::time::timeout(
            Duration::from_secs(u64::from(SESSION_SECONDS) + 5),
            play_session(&mut quiz, &mut lines),
        )
        .await
        .expect("countdown should end the session")
        .unwrap()
        .unwrap();
        assert!(result.timed_out);
        assert_eq!(result.score, 0);
    }
}
