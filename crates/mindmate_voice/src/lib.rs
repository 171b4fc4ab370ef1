//! Voice module for MindMate
//!
//! Host speech capabilities sit behind two traits, [`SpeechSynthesizer`] and
//! [`SpeechRecognizer`]. The adapters [`SpeechOutput`] and [`SpeechInput`]
//! wrap them and absorb every failure so the conversation keeps working
//! without a speaker or a microphone.

mod espeak;
mod listen;
mod probe;
mod stt;
mod tts;

pub use espeak::{parse_voice_list, EspeakSynthesizer};
pub use listen::CommandRecognizer;
pub use probe::find_program;
pub use stt::{
    ListenState, RecognitionEvent, RecognitionEvents, RecognizerSettings, SetupError, SpeechInput,
    SpeechRecognizer,
};
pub use tts::{
    select_voice, SpeechOutput, SpeechSynthesizer, UtteranceRequest, Voice, VoiceGender,
};
