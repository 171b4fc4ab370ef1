//! Text-to-Speech (TTS) capability and the speech output adapter

use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceGender {
    Female,
    Male,
    #[default]
    Unknown,
}

/// A voice offered by the host synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Identifier passed back to the synthesizer when speaking
    pub id: String,
    /// Human-readable name
    pub name: String,
    pub language: String,
    pub gender: VoiceGender,
}

/// One request to vocalize text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceRequest {
    pub text: String,
    /// `None` leaves the choice to the host's default voice
    pub voice: Option<Voice>,
}

/// Host speech-synthesis capability
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Voices currently available. May be empty, especially on first query.
    async fn voices(&self) -> Result<Vec<Voice>>;

    /// Submit an utterance for playback.
    ///
    /// Returns once the host has accepted the request; playback continues
    /// in the background.
    async fn speak(&self, request: UtteranceRequest) -> Result<()>;

    /// Get the name of this TTS provider
    fn provider_name(&self) -> &'static str;
}

/// Pick the preferred voice: the first one whose name contains any of the
/// hints (case-insensitive) or that declares itself female, else the first
/// voice listed.
pub fn select_voice<'a>(voices: &'a [Voice], hints: &[String]) -> Option<&'a Voice> {
    voices
        .iter()
        .find(|voice| {
            let name = voice.name.to_lowercase();
            voice.gender == VoiceGender::Female
                || hints.iter().any(|hint| name.contains(&hint.to_lowercase()))
        })
        .or_else(|| voices.first())
}

/// Best-effort speech output.
///
/// Never fails: a missing synthesizer or a rejected request is logged and the
/// reply simply stays text-only.
pub struct SpeechOutput {
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    voice_hints: Vec<String>,
}

impl SpeechOutput {
    pub fn new(synthesizer: Option<Box<dyn SpeechSynthesizer>>, voice_hints: Vec<String>) -> Self {
        if let Some(synth) = &synthesizer {
            tracing::info!("Speech output using {}", synth.provider_name());
        }
        Self {
            synthesizer,
            voice_hints,
        }
    }

    /// Output adapter with no synthesis capability.
    pub fn silent() -> Self {
        Self::new(None, Vec::new())
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Vocalize `text`. Fire-and-forget.
    pub async fn speak(&self, text: &str) {
        let Some(synth) = &self.synthesizer else {
            tracing::warn!("Speech synthesis not supported");
            return;
        };

        let voices = match synth.voices().await {
            Ok(voices) => voices,
            Err(e) => {
                tracing::debug!("Voice list unavailable from {}: {:#}", synth.provider_name(), e);
                Vec::new()
            }
        };
        let voice = select_voice(&voices, &self.voice_hints).cloned();
        if let Some(v) = &voice {
            tracing::debug!("Speaking with voice {} ({})", v.name, v.id);
        }

        let request = UtteranceRequest {
            text: text.to_string(),
            voice,
        };
        if let Err(e) = synth.speak(request).await {
            tracing::warn!("{} rejected utterance: {:#}", synth.provider_name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn voice(id: &str, name: &str, gender: VoiceGender) -> Voice {
        Voice {
            id: id.to_string(),
            name: name.to_string(),
            language: "en".to_string(),
            gender,
        }
    }

    fn hints() -> Vec<String> {
        vec!["female".into(), "woman".into(), "zira".into()]
    }

    struct RecordingSynth {
        voices: Vec<Voice>,
        spoken: Arc<Mutex<Vec<UtteranceRequest>>>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynth {
        async fn voices(&self) -> Result<Vec<Voice>> {
            Ok(self.voices.clone())
        }

        async fn speak(&self, request: UtteranceRequest) -> Result<()> {
            self.spoken.lock().unwrap().push(request);
            if self.fail {
                anyhow::bail!("audio device busy");
            }
            Ok(())
        }

        fn provider_name(&self) -> &'static str {
            "recording"
        }
    }

    #[test]
    fn test_prefers_name_hint() {
        let voices = vec![
            voice("david", "Microsoft David", VoiceGender::Male),
            voice("zira", "Microsoft Zira", VoiceGender::Unknown),
        ];
        assert_eq!(select_voice(&voices, &hints()).unwrap().id, "zira");
    }

    #[test]
    fn test_prefers_declared_gender() {
        let voices = vec![
            voice("m1", "Alex", VoiceGender::Male),
            voice("f1", "Samantha", VoiceGender::Female),
        ];
        assert_eq!(select_voice(&voices, &hints()).unwrap().id, "f1");
    }

    #[test]
    fn test_hint_match_is_case_insensitive() {
        let voices = vec![
            voice("a", "Robot", VoiceGender::Unknown),
            voice("b", "English WOMAN", VoiceGender::Unknown),
        ];
        assert_eq!(select_voice(&voices, &hints()).unwrap().id, "b");
    }

    #[test]
    fn test_falls_back_to_first() {
        let voices = vec![
            voice("m1", "Alex", VoiceGender::Male),
            voice("m2", "Fred", VoiceGender::Male),
        ];
        assert_eq!(select_voice(&voices, &hints()).unwrap().id, "m1");
        assert!(select_voice(&[], &hints()).is_none());
    }

    #[tokio::test]
    async fn test_speak_submits_exact_text_with_voice() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let synth = RecordingSynth {
            voices: vec![
                voice("m1", "Alex", VoiceGender::Male),
                voice("f1", "Victoria", VoiceGender::Female),
            ],
            spoken: spoken.clone(),
            fail: false,
        };
        let output = SpeechOutput::new(Some(Box::new(synth)), hints());
        assert!(output.is_available());

        output.speak("Tell me more!").await;

        let spoken = spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Tell me more!");
        assert_eq!(spoken[0].voice.as_ref().unwrap().id, "f1");
    }

    #[tokio::test]
    async fn test_speak_without_voices_uses_default() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let synth = RecordingSynth {
            voices: vec![],
            spoken: spoken.clone(),
            fail: false,
        };
        let output = SpeechOutput::new(Some(Box::new(synth)), hints());
        output.speak("hello").await;
        assert!(spoken.lock().unwrap()[0].voice.is_none());
    }

    #[tokio::test]
    async fn test_rejected_request_is_absorbed() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let synth = RecordingSynth {
            voices: vec![],
            spoken: spoken.clone(),
            fail: true,
        };
        let output = SpeechOutput::new(Some(Box::new(synth)), hints());
        output.speak("hello").await;
        assert_eq!(spoken.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_silent_output_is_noop() {
        let output = SpeechOutput::silent();
        assert!(!output.is_available());
        output.speak("nobody hears this").await;
    }
}
