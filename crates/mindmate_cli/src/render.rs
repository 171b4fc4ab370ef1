//! Plain-text rendering of the conversation view.

use mindmate_core::ConversationState;

pub const TITLE: &str = "MindMate Lite";

/// Response box: mood tag, capitalized mood label, latest reply.
pub fn response_box(state: &ConversationState) -> String {
    let mood = state.current_mood;
    let mut out = format!("[mood-{}] Mood: {}", mood.as_str(), mood.label());
    if !state.last_reply.is_empty() {
        out.push('\n');
        out.push_str(&state.last_reply);
    }
    out
}

/// Control row: send availability and microphone label.
pub fn controls(state: &ConversationState, voice_input: bool) -> String {
    let send = if state.can_submit() { "[Send]" } else { "[Send: disabled]" };
    if voice_input {
        format!("{}  [{}]", send, state.mic_label())
    } else {
        send.to_string()
    }
}

pub fn view(state: &ConversationState, voice_input: bool) -> String {
    format!("{}\n{}", response_box(state), controls(state, voice_input))
}
