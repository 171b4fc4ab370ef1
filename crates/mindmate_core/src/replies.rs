//! Canned replies, one list per mood, and uniform random selection.

use crate::config::RepliesConfig;
use crate::error::MindMateError;
use crate::mood::Mood;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const HAPPY: &[&str] = &[
    "I'm so happy to hear that! Keep shining bright! ✨",
    "That's wonderful! Your happiness is contagious 😊",
    "Yay! Keep spreading those good vibes!",
    "Awesome! Stay cheerful and keep smiling 😄",
];

const SAD: &[&str] = &[
    "I'm here for you. Remember, tough times don’t last, but tough people do.",
    "It’s okay to feel sad sometimes. Sending you a virtual hug 🤗",
    "I understand, but brighter days are coming your way.",
    "Don’t give up. You’ve got this!",
];

const ANGRY: &[&str] = &[
    "Take a deep breath. Let's try to calm down together. 🧘‍♀️",
    "I know it’s frustrating. Sometimes a short walk helps clear the mind.",
    "Anger is natural. Try counting to ten slowly.",
    "I'm here with you — let's find a way to relax.",
];

const NEUTRAL: &[&str] = &[
    "Thanks for sharing! How can I assist you further?",
    "I'm here whenever you want to talk.",
    "Tell me more!",
    "Let's chat. What’s on your mind?",
];

/// Immutable mapping from mood to its ordered reply candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTable {
    happy: Vec<String>,
    sad: Vec<String>,
    angry: Vec<String>,
    neutral: Vec<String>,
}

impl ReplyTable {
    /// The built-in reply lists.
    pub fn builtin() -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            happy: owned(HAPPY),
            sad: owned(SAD),
            angry: owned(ANGRY),
            neutral: owned(NEUTRAL),
        }
    }

    /// Build the table from config, keeping built-in lists for moods the
    /// config leaves out.
    ///
    /// Every list must be non-empty and free of blank entries.
    pub fn from_config(config: &RepliesConfig) -> Result<Self, MindMateError> {
        let mut table = Self::builtin();
        for mood in Mood::ALL {
            if let Some(list) = config.get(mood) {
                *table.slot_mut(mood) = list.clone();
            }
        }
        table.validate()?;
        Ok(table)
    }

    pub fn candidates(&self, mood: Mood) -> &[String] {
        match mood {
            Mood::Happy => &self.happy,
            Mood::Sad => &self.sad,
            Mood::Angry => &self.angry,
            Mood::Neutral => &self.neutral,
        }
    }

    fn slot_mut(&mut self, mood: Mood) -> &mut Vec<String> {
        match mood {
            Mood::Happy => &mut self.happy,
            Mood::Sad => &mut self.sad,
            Mood::Angry => &mut self.angry,
            Mood::Neutral => &mut self.neutral,
        }
    }

    fn validate(&self) -> Result<(), MindMateError> {
        for mood in Mood::ALL {
            let list = self.candidates(mood);
            if list.is_empty() {
                return Err(MindMateError::NoReplies(mood));
            }
            if list.iter().any(|reply| reply.trim().is_empty()) {
                return Err(MindMateError::BlankReply(mood));
            }
        }
        Ok(())
    }
}

impl Default for ReplyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Picks a reply uniformly at random from the table.
///
/// The random source is injectable so callers can seed it.
pub struct ReplySelector<R = StdRng> {
    table: ReplyTable,
    rng: R,
}

impl ReplySelector<StdRng> {
    /// Selector backed by an OS-seeded `StdRng`.
    pub fn new(table: ReplyTable) -> Self {
        Self::with_rng(table, StdRng::from_entropy())
    }

    /// Selector with a fixed seed, for reproducible sessions.
    pub fn seeded(table: ReplyTable, seed: u64) -> Self {
        Self::with_rng(table, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReplySelector<R> {
    pub fn with_rng(table: ReplyTable, rng: R) -> Self {
        Self { table, rng }
    }

    pub fn table(&self) -> &ReplyTable {
        &self.table
    }

    pub fn select(&mut self, mood: Mood) -> Result<String, MindMateError> {
        self.table
            .candidates(mood)
            .choose(&mut self.rng)
            .cloned()
            .ok_or(MindMateError::NoReplies(mood))
    }
}
