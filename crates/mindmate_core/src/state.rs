use crate::mood::Mood;
use serde::{Deserialize, Serialize};

pub const MIC_IDLE_LABEL: &str = "🎤 Start Voice Input";
pub const MIC_LISTENING_LABEL: &str = "🎙️ Listening...";

/// Transient UI state of one conversation.
///
/// Owned by the controller and only changed through its transition methods.
/// Lives for a single session; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Current contents of the text box (typed or transcribed).
    pub input_text: String,
    /// Latest reply shown to the user, empty before the first one.
    pub last_reply: String,
    pub current_mood: Mood,
    /// True only while a recognition session is in flight.
    pub is_listening: bool,
}

impl ConversationState {
    /// Whether the send control is enabled.
    pub fn can_submit(&self) -> bool {
        is_submittable(&self.input_text)
    }

    pub fn mic_label(&self) -> &'static str {
        if self.is_listening {
            MIC_LISTENING_LABEL
        } else {
            MIC_IDLE_LABEL
        }
    }
}

/// An utterance is only processed when it has non-whitespace content.
pub fn is_submittable(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ConversationState::default();
        assert_eq!(state.input_text, "");
        assert_eq!(state.last_reply, "");
        assert_eq!(state.current_mood, Mood::Neutral);
        assert!(!state.is_listening);
        assert!(!state.can_submit());
        assert_eq!(state.mic_label(), MIC_IDLE_LABEL);
    }

    #[test]
    fn test_can_submit_ignores_whitespace() {
        let mut state = ConversationState::default();
        state.input_text = " \t\n".to_string();
        assert!(!state.can_submit());
        state.input_text = " hi ".to_string();
        assert!(state.can_submit());
    }

    #[test]
    fn test_serializes_as_plain_tuple() {
        let state = ConversationState {
            input_text: "hello".into(),
            last_reply: "Tell me more!".into(),
            current_mood: Mood::Happy,
            is_listening: true,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["current_mood"], "happy");
        assert_eq!(json["is_listening"], true);

        let back: ConversationState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.mic_label(), MIC_LISTENING_LABEL);
    }
}
