//! Keyword-based mood classification.
//!
//! Matching is a case-insensitive substring test, so "unhappy" also contains
//! "happy" and "made" contains "mad". Categories are checked in a fixed
//! priority order and the first hit wins.

use crate::error::MindMateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HAPPY: &[&str] = &["happy", "good", "great", "awesome"];

const SAD: &[&str] = &["sad", "down", "unhappy", "depressed"];

const ANGRY: &[&str] = &["angry", "mad", "frustrated", "upset"];

/// Categories in the order they are tested. Neutral is the fallback and has
/// no keywords of its own.
const PRIORITY: &[(Mood, &[&str])] = &[
    (Mood::Happy, HAPPY),
    (Mood::Sad, SAD),
    (Mood::Angry, ANGRY),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    #[default]
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Angry, Mood::Neutral];

    /// Lower-case identifier, also used for the `mood-*` display tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
        }
    }

    /// Capitalized label for display ("Happy").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Neutral => "Neutral",
        }
    }

    /// Trigger keywords for this mood. Empty for `Neutral`.
    pub fn keywords(&self) -> &'static [&'static str] {
        PRIORITY
            .iter()
            .find(|(mood, _)| mood == self)
            .map(|(_, words)| *words)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = MindMateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MindMateError::UnknownMood(s.to_string()))
    }
}

/// Classify free text into a mood.
///
/// Deterministic and side-effect free. Text that matches none of the keyword
/// sets is `Neutral`.
pub fn classify(text: &str) -> Mood {
    let lower = text.to_lowercase();
    PRIORITY
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(mood, _)| *mood)
        .unwrap_or(Mood::Neutral)
}
