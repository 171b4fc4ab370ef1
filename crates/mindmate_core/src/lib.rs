//! # MindMate Core
//!
//! The pure part of MindMate Lite: everything that can be decided without
//! touching a microphone or a speaker.
//!
//! - [`mood`]: keyword-based mood classification
//! - [`replies`]: per-mood canned replies and random selection
//! - [`state`]: the conversation state tuple owned by the controller
//! - [`config`]: TOML configuration with env overrides

pub mod config;
pub mod error;
pub mod mood;
pub mod replies;
pub mod state;

pub use config::{MindMateConfig, RecognizerConfig, RepliesConfig, SpeechConfig, SynthesizerConfig};
pub use error::MindMateError;
pub use mood::{classify, Mood};
pub use replies::{ReplySelector, ReplyTable};
pub use state::ConversationState;
