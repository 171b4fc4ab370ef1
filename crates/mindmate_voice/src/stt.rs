//! Speech-to-Text (STT) capability and the speech input adapter

use anyhow::Result;
use tokio::sync::mpsc;

/// How the recognizer is asked to listen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerSettings {
    pub locale: String,
    /// Emit partial transcripts while the user is still speaking
    pub interim_results: bool,
    /// Number of alternative transcriptions per utterance
    pub max_alternatives: u8,
}

impl RecognizerSettings {
    /// One final transcript per utterance, one alternative.
    pub fn single_utterance(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

/// Terminal outcome of one recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Final transcript of the utterance
    Result(String),
    /// Diagnostic reason, e.g. "no-speech" or "audio-capture"
    Error(String),
    /// The engine stopped on its own without a transcript
    End,
}

/// Channel on which a recognizer delivers its events.
pub type RecognitionEvents = mpsc::UnboundedSender<RecognitionEvent>;

/// Host speech-recognition capability.
///
/// `start` and `stop` only issue requests; outcomes arrive asynchronously on
/// the recognizer's [`RecognitionEvents`] channel.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> Result<()>;

    /// Abandon the in-flight session, if any. May not produce an event.
    fn stop(&mut self);

    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenState {
    #[default]
    Idle,
    Listening,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("Sorry, speech recognition is not supported here. Voice input is disabled.")]
    RecognitionUnavailable,
}

/// Single-utterance speech input.
///
/// Probed once at setup. Without a recognizer the adapter stays inert for
/// the rest of the session and every request is ignored.
pub struct SpeechInput {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    state: ListenState,
}

impl SpeechInput {
    pub fn setup(recognizer: Option<Box<dyn SpeechRecognizer>>) -> Result<Self, SetupError> {
        match recognizer {
            Some(recognizer) => {
                tracing::info!("Speech input using {}", recognizer.provider_name());
                Ok(Self {
                    recognizer: Some(recognizer),
                    state: ListenState::Idle,
                })
            }
            None => Err(SetupError::RecognitionUnavailable),
        }
    }

    pub fn inert() -> Self {
        Self {
            recognizer: None,
            state: ListenState::Idle,
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == ListenState::Listening
    }

    /// `Idle -> Listening`. Returns whether listening actually started.
    pub fn start(&mut self) -> bool {
        let Some(recognizer) = self.recognizer.as_mut() else {
            tracing::debug!("Speech input is inert, ignoring start");
            return false;
        };
        if self.state == ListenState::Listening {
            tracing::debug!("Already listening, ignoring start");
            return false;
        }
        match recognizer.start() {
            Ok(()) => {
                self.state = ListenState::Listening;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to start {}: {:#}", recognizer.provider_name(), e);
                false
            }
        }
    }

    /// `Listening -> Idle` without waiting for a result.
    pub fn stop(&mut self) {
        if self.state != ListenState::Listening {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        self.state = ListenState::Idle;
    }

    /// Apply a recognizer event to the live session.
    ///
    /// Any event ends the session and is handed back to the caller. Events
    /// that arrive while idle belong to a session that was already stopped
    /// and are dropped.
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<RecognitionEvent> {
        if self.state != ListenState::Listening {
            tracing::debug!("Ignoring recognition event outside a session: {:?}", event);
            return None;
        }
        self.state = ListenState::Idle;
        match &event {
            RecognitionEvent::Result(_) => {}
            RecognitionEvent::Error(reason) => {
                tracing::warn!("Speech recognition error: {}", reason);
            }
            RecognitionEvent::End => tracing::debug!("Speech recognition ended"),
        }
        Some(event)
    }
}

impl Drop for SpeechInput {
    fn drop(&mut self) {
        self.stop();
    }
}
