//! eSpeak NG command-line synthesizer.

use crate::probe::find_program;
use crate::tts::{SpeechSynthesizer, UtteranceRequest, Voice, VoiceGender};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::OnceCell;

const VOICE_LIST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct EspeakSynthesizer {
    program: PathBuf,
    voices: OnceCell<Vec<Voice>>,
}

impl EspeakSynthesizer {
    /// Look for `command` on this host. `None` means no synthesis capability.
    pub fn probe(command: &str) -> Option<Self> {
        match find_program(command) {
            Some(program) => {
                tracing::info!("Found speech synthesizer at {}", program.display());
                Some(Self::with_program(program))
            }
            None => {
                tracing::info!("Speech synthesizer '{}' not found", command);
                None
            }
        }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            voices: OnceCell::new(),
        }
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        let exec_future = Command::new(&self.program)
            .arg("--voices")
            .stdin(Stdio::null())
            .output();

        let output = match tokio::time::timeout(VOICE_LIST_TIMEOUT, exec_future).await {
            Ok(res) => res.context("Failed to query synthesizer voices")?,
            Err(_) => anyhow::bail!("Voice query timed out after {:?}", VOICE_LIST_TIMEOUT),
        };
        if !output.status.success() {
            anyhow::bail!(
                "Voice query failed with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    async fn voices(&self) -> Result<Vec<Voice>> {
        // A failed query is not cached, the next call tries again.
        let voices = self.voices.get_or_try_init(|| self.list_voices()).await?;
        Ok(voices.clone())
    }

    async fn speak(&self, request: UtteranceRequest) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        if let Some(voice) = &request.voice {
            cmd.arg("-v").arg(&voice.id);
        }
        // "--" keeps replies starting with '-' from being read as flags
        cmd.arg("--")
            .arg(&request.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .with_context(|| format!("Failed to launch {}", self.program.display()))?;

        tokio::spawn(async move {
            match child.wait_with_output().await {
                Ok(output) if !output.status.success() => {
                    tracing::warn!(
                        "Synthesizer exited with {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                }
                Ok(_) => tracing::debug!("Playback finished"),
                Err(e) => tracing::warn!("Lost track of synthesizer process: {}", e),
            }
        });
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "espeak-ng"
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  2  en-us           --/F      English_(America)  gmw/en-US           (en 3)
/// ```
///
/// The language code doubles as the voice id passed to `-v`.
pub fn parse_voice_list(table: &str) -> Vec<Voice> {
    table
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let priority = cols.next()?;
            if priority.parse::<u32>().is_err() {
                return None; // header
            }
            let language = cols.next()?;
            let age_gender = cols.next()?;
            let name = cols.next()?;
            let gender = match age_gender.rsplit('/').next() {
                Some("F") | Some("f") => VoiceGender::Female,
                Some("M") | Some("m") => VoiceGender::Male,
                _ => VoiceGender::Unknown,
            };
            Some(Voice {
                id: language.to_string(),
                name: name.replace('_', " "),
                language: language.to_string(),
                gender,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-us           --/F      English_(America)  gmw/en-US           (en 3)
 5  fr-fr           --/-      French             roa/fr
";

    #[test]
    fn test_parse_voice_list() {
        let voices = parse_voice_list(SAMPLE);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].id, "af");
        assert_eq!(voices[0].gender, VoiceGender::Male);
        assert_eq!(voices[1].name, "English (America)");
        assert_eq!(voices[1].gender, VoiceGender::Female);
        assert_eq!(voices[2].gender, VoiceGender::Unknown);
    }

    #[test]
    fn test_parse_ignores_garbage() {
        assert!(parse_voice_list("").is_empty());
        assert!(parse_voice_list("Pty Language\n\n 3\n").is_empty());
    }

    #[test]
    fn test_probe_missing_program() {
        assert!(EspeakSynthesizer::probe("mindmate-no-such-synth-9931").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_voice_query_is_not_cached() {
        // `false` exits non-zero for any arguments
        let Some(program) = find_program("false") else {
            return;
        };
        let synth = EspeakSynthesizer::with_program(program);
        assert!(synth.voices().await.is_err());
        assert!(synth.voices().await.is_err());
        assert!(synth.voices.get().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_returns_once_accepted() {
        // `true` accepts and ignores any arguments
        let Some(program) = find_program("true") else {
            return;
        };
        let synth = EspeakSynthesizer::with_program(program);
        let request = UtteranceRequest {
            text: "-hello".to_string(),
            voice: None,
        };
        synth.speak(request).await.unwrap();
    }
}
