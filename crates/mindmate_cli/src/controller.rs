//! Conversation controller.
//!
//! Owns the [`ConversationState`] and is the only thing that mutates it.
//! Every user action and recognizer event maps to one transition method, and
//! each transition publishes the new state on a watch channel.

use mindmate_core::state::is_submittable;
use mindmate_core::{classify, ConversationState, ReplySelector};
use mindmate_voice::{RecognitionEvent, SpeechInput, SpeechOutput, SpeechRecognizer};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, error, info};

pub struct ConversationController<R = StdRng> {
    state: ConversationState,
    replies: ReplySelector<R>,
    output: SpeechOutput,
    input: SpeechInput,
    setup_notice: Option<String>,
    state_tx: watch::Sender<ConversationState>,
}

impl<R: Rng> ConversationController<R> {
    /// Mount the conversation. Recognition is probed here, once; when it is
    /// missing the microphone stays inert and a notice is queued for the user.
    pub fn new(
        replies: ReplySelector<R>,
        output: SpeechOutput,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
    ) -> Self {
        let (input, setup_notice) = match SpeechInput::setup(recognizer) {
            Ok(input) => (input, None),
            Err(e) => {
                info!("Voice input disabled: {}", e);
                (SpeechInput::inert(), Some(e.to_string()))
            }
        };
        let state = ConversationState::default();
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            state,
            replies,
            output,
            input,
            setup_notice,
            state_tx,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Observe the state as transitions publish it.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state_tx.subscribe()
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    pub fn voice_input_available(&self) -> bool {
        self.input.is_available()
    }

    /// The setup notice, handed out at most once per session.
    pub fn take_setup_notice(&mut self) -> Option<String> {
        self.setup_notice.take()
    }

    /// The user edited the text box.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input_text = text.into();
        self.publish();
    }

    /// Send whatever is currently in the text box.
    pub async fn send(&mut self) -> Option<String> {
        let text = self.state.input_text.clone();
        self.submit(&text).await
    }

    /// Classify `text`, pick a reply, store both and speak the reply.
    ///
    /// Empty or whitespace-only text is ignored. Returns the reply when one
    /// was produced.
    pub async fn submit(&mut self, text: &str) -> Option<String> {
        if !is_submittable(text) {
            debug!("Ignoring empty submission");
            return None;
        }

        let mood = classify(text);
        self.state.current_mood = mood;

        let reply = match self.replies.select(mood) {
            Ok(reply) => reply,
            Err(e) => {
                error!("No reply available: {}", e);
                self.publish();
                return None;
            }
        };
        debug!("Mood {} -> {:?}", mood, reply);
        self.state.last_reply = reply.clone();
        self.publish();

        self.output.speak(&reply).await;
        Some(reply)
    }

    /// Microphone button.
    pub fn toggle_listening(&mut self) {
        if self.state.is_listening {
            self.input.stop();
            self.state.is_listening = false;
            self.publish();
            return;
        }
        if !self.input.is_available() {
            debug!("Microphone toggle ignored, no speech recognition");
            return;
        }

        // The cleared view is visible before the recognizer starts.
        self.state.input_text.clear();
        self.state.last_reply.clear();
        self.publish();

        self.state.is_listening = self.input.start();
        self.publish();
    }

    pub async fn on_recognition_result(&mut self, transcript: String) -> Option<String> {
        self.handle_recognition_event(RecognitionEvent::Result(transcript)).await
    }

    pub fn on_recognition_error(&mut self, reason: String) {
        if self.input.handle_event(RecognitionEvent::Error(reason)).is_some() {
            self.end_listening();
        }
    }

    pub fn on_recognition_end(&mut self) {
        if self.input.handle_event(RecognitionEvent::End).is_some() {
            self.end_listening();
        }
    }

    /// Dispatch an event delivered by the recognizer.
    ///
    /// Events from a session the user already stopped leave the state alone.
    pub async fn handle_recognition_event(&mut self, event: RecognitionEvent) -> Option<String> {
        let event = self.input.handle_event(event)?;
        self.end_listening();
        match event {
            RecognitionEvent::Result(transcript) => {
                self.set_input(transcript);
                self.send().await
            }
            RecognitionEvent::Error(_) | RecognitionEvent::End => None,
        }
    }

    fn end_listening(&mut self) {
        self.state.is_listening = false;
        self.publish();
    }

    /// Unmount: release the recognizer if a session is still running.
    pub fn teardown(&mut self) {
        self.input.stop();
        self.end_listening();
    }
}
