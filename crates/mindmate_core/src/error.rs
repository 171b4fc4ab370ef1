use crate::mood::Mood;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MindMateError {
    /// A mood has no reply candidates to choose from.
    #[error("no reply candidates configured for mood '{0}'")]
    NoReplies(Mood),

    #[error("reply candidates for mood '{0}' contain a blank entry")]
    BlankReply(Mood),

    #[error("unknown mood label '{0}'")]
    UnknownMood(String),
}
