//! Single-utterance recognizer backed by an external command.
//!
//! The command records one utterance, prints the transcript on stdout and
//! exits. Each session yields exactly one [`RecognitionEvent`]:
//!
//! - first non-empty stdout line  -> `Result(line)`
//! - clean exit, nothing printed   -> `End`
//! - non-zero exit or I/O failure  -> `Error(reason)`

use crate::probe::find_program;
use crate::stt::{RecognitionEvent, RecognitionEvents, RecognizerSettings, SpeechRecognizer};
use anyhow::{Context, Result};
use mindmate_core::RecognizerConfig;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::task::JoinHandle;

pub struct CommandRecognizer {
    program: PathBuf,
    args: Vec<String>,
    settings: RecognizerSettings,
    events: RecognitionEvents,
    session: Option<JoinHandle<()>>,
}

impl CommandRecognizer {
    /// Probe for the configured command. `None` means this host has no
    /// recognition capability.
    pub fn probe(
        config: &RecognizerConfig,
        settings: RecognizerSettings,
        events: RecognitionEvents,
    ) -> Option<Self> {
        let Some(command) = config.command.as_deref() else {
            tracing::info!("No speech recognizer configured");
            return None;
        };
        let Some(program) = find_program(command) else {
            tracing::info!("Speech recognizer '{}' not found", command);
            return None;
        };
        tracing::info!("Found speech recognizer at {}", program.display());
        Some(Self::new(program, config.args.clone(), settings, events))
    }

    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        settings: RecognizerSettings,
        events: RecognitionEvents,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            settings,
            events,
            session: None,
        }
    }

    fn rendered_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{locale}", &self.settings.locale))
            .collect()
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn start(&mut self) -> Result<()> {
        // At most one session in flight; a restart replaces the old one.
        self.stop();

        let mut cmd = Command::new(&self.program);
        cmd.args(self.rendered_args())
            .env("MINDMATE_LOCALE", &self.settings.locale)
            .env("MINDMATE_INTERIM_RESULTS", self.settings.interim_results.to_string())
            .env("MINDMATE_MAX_ALTERNATIVES", self.settings.max_alternatives.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("Failed to launch {}", self.program.display()))?;

        let events = self.events.clone();
        self.session = Some(tokio::spawn(async move {
            let event = match child.wait_with_output().await {
                Ok(output) if output.status.success() => {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    match stdout.lines().map(str::trim).find(|l| !l.is_empty()) {
                        Some(transcript) => RecognitionEvent::Result(transcript.to_string()),
                        None => RecognitionEvent::End,
                    }
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let reason = stderr.lines().map(str::trim).find(|l| !l.is_empty());
                    RecognitionEvent::Error(match reason {
                        Some(reason) => reason.to_string(),
                        None => format!("recognizer exited with {}", output.status),
                    })
                }
                Err(e) => RecognitionEvent::Error(format!("audio-capture: {}", e)),
            };
            if events.send(event).is_err() {
                tracing::debug!("Recognition event dropped, receiver is gone");
            }
        }));
        Ok(())
    }

    fn stop(&mut self) {
        // Aborting drops the child, which kill_on_drop terminates.
        if let Some(session) = self.session.take() {
            session.abort();
        }
    }

    fn provider_name(&self) -> &'static str {
        "command recognizer"
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}
