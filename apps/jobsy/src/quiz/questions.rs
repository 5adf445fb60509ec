use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::quiz::QuizError;

/// Answer choice label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
}

impl ChoiceKey {
    pub const ALL: [ChoiceKey; 4] = [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D];

    fn index(self) -> usize {
        match self {
            ChoiceKey::A => 0,
            ChoiceKey::B => 1,
            ChoiceKey::C => 2,
            ChoiceKey::D => 3,
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
        };
        f.write_str(letter)
    }
}

impl FromStr for ChoiceKey {
    type Err = QuizError;

    /// Case-insensitive single letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(ChoiceKey::A),
            "B" => Ok(ChoiceKey::B),
            "C" => Ok(ChoiceKey::C),
            "D" => Ok(ChoiceKey::D),
            _ => Err(QuizError::InvalidChoice(s.trim().to_string())),
        }
    }
}

/// A static multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: u32,
    pub prompt: &'static str,
    /// Option text for A, B, C, D in that order.
    pub options: [&'static str; 4],
    pub correct: ChoiceKey,
    pub explanation: &'static str,
}

impl QuizQuestion {
    pub fn option(&self, key: ChoiceKey) -> &'static str {
        self.options[key.index()]
    }

    pub fn choices(&self) -> impl Iterator<Item = (ChoiceKey, &'static str)> + '_ {
        ChoiceKey::ALL.into_iter().map(|key| (key, self.option(key)))
    }
}

/// Logic, verbal and quantitative reasoning questions sessions are drawn from.
pub const QUESTION_POOL: [QuizQuestion; 6] = [
    QuizQuestion {
        id: 1,
        prompt: "If a train running at 50 km/h crosses a man standing on a platform in 10 seconds, what is the length of the train in meters?",
        options: ["138.9 m", "145.5 m", "160.2 m", "125.8 m"],
        correct: ChoiceKey::A,
        explanation: "Length = Speed × Time. 50 km/h = 13.89 m/s. 13.89 * 10 = 138.9 meters.",
    },
    QuizQuestion {
        id: 2,
        prompt: "Choose the word that is opposite in meaning to 'Frugal'.",
        options: ["Economical", "Wasteful", "Thrifty", "Miserly"],
        correct: ChoiceKey::B,
        explanation: "'Frugal' means sparing. The opposite is 'Wasteful'.",
    },
    QuizQuestion {
        id: 3,
        prompt: "Find the next number in the series: 3, 7, 15, 31, 63, ...",
        options: ["127", "128", "129", "131"],
        correct: ChoiceKey::A,
        explanation: "The pattern is (x * 2) + 1. (63 * 2) + 1 = 127.",
    },
    QuizQuestion {
        id: 4,
        prompt: "Which of the following is not a standard agile ceremony?",
        options: [
            "Sprint Planning",
            "Daily Standup",
            "Executive Monthly Review",
            "Sprint Retrospective",
        ],
        correct: ChoiceKey::C,
        explanation: "Standard Agile ceremonies include Planning, Standup, Review, and Retrospective. Executive reviews are separate organizational meetings.",
    },
    QuizQuestion {
        id: 5,
        prompt: "A project has a 20% chance of failing. If it fails, the loss is $100k. What is the expected loss?",
        options: ["$10k", "$20k", "$50k", "$80k"],
        correct: ChoiceKey::B,
        explanation: "Expected Value = Probability * Outcome. 0.20 * $100,000 = $20,000.",
    },
    QuizQuestion {
        id: 6,
        prompt: "What is 40% of 350?",
        options: ["120", "140", "160", "180"],
        correct: ChoiceKey::B,
        explanation: "0.40 * 350 = 140.",
    },
];
