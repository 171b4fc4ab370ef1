use crate::mood::Mood;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MindMateConfig {
    pub speech: SpeechConfig,
    pub replies: RepliesConfig,
}

impl MindMateConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: MindMateConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// `<config_dir>/mindmate/config.toml`, or `mindmate.toml` in the working
    /// directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("mindmate").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("mindmate.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("MINDMATE_LOCALE") {
            self.speech.locale = v;
        }
        if let Ok(v) = std::env::var("MINDMATE_RECOGNIZER_COMMAND") {
            self.speech.recognizer.command = Some(v).filter(|c| !c.trim().is_empty());
        }
        if let Ok(v) = std::env::var("MINDMATE_SYNTHESIZER_COMMAND") {
            self.speech.synthesizer.command = v;
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Fixed recognition locale.
    pub locale: String,
    pub recognizer: RecognizerConfig,
    pub synthesizer: SynthesizerConfig,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            recognizer: RecognizerConfig::default(),
            synthesizer: SynthesizerConfig::default(),
        }
    }
}

/// External single-utterance recognizer. The command prints the transcript
/// on stdout and exits; `{locale}` in `args` is replaced with the locale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// No command means no recognition capability.
    pub command: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    pub enabled: bool,
    pub command: String,
    /// Case-insensitive fragments of voice names that mark a preferred voice.
    pub voice_hints: Vec<String>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak-ng".to_string(),
            voice_hints: vec!["female".to_string(), "woman".to_string(), "zira".to_string()],
        }
    }
}

/// Optional per-mood reply overrides. `None` keeps the built-in list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepliesConfig {
    pub happy: Option<Vec<String>>,
    pub sad: Option<Vec<String>>,
    pub angry: Option<Vec<String>>,
    pub neutral: Option<Vec<String>>,
}

impl RepliesConfig {
    pub fn get(&self, mood: Mood) -> Option<&Vec<String>> {
        match mood {
            Mood::Happy => self.happy.as_ref(),
            Mood::Sad => self.sad.as_ref(),
            Mood::Angry => self.angry.as_ref(),
            Mood::Neutral => self.neutral.as_ref(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = MindMateConfig::default();
        assert_eq!(cfg.speech.locale, "en-US");
        assert!(cfg.speech.recognizer.command.is_none());
        assert!(cfg.speech.synthesizer.enabled);
        assert_eq!(cfg.speech.synthesizer.command, "espeak-ng");
        assert_eq!(cfg.speech.synthesizer.voice_hints.len(), 3);
        assert!(cfg.replies.get(Mood::Happy).is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[speech]
locale = "en-GB"
"#;
        let cfg: MindMateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.speech.locale, "en-GB");
        // Defaults for unspecified fields
        assert_eq!(cfg.speech.synthesizer.command, "espeak-ng");
        assert!(cfg.speech.recognizer.args.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[speech]
locale = "en-US"

[speech.recognizer]
command = "listen-once"
args = ["--lang", "{locale}"]

[speech.synthesizer]
enabled = false
command = "/usr/bin/espeak"
voice_hints = ["zira"]

[replies]
happy = ["Nice!"]
neutral = ["Go on.", "I'm listening."]
"#;
        let cfg: MindMateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.speech.recognizer.command.as_deref(), Some("listen-once"));
        assert_eq!(cfg.speech.recognizer.args, vec!["--lang", "{locale}"]);
        assert!(!cfg.speech.synthesizer.enabled);
        assert_eq!(cfg.speech.synthesizer.voice_hints, vec!["zira"]);
        assert_eq!(cfg.replies.get(Mood::Happy).unwrap().len(), 1);
        assert_eq!(cfg.replies.get(Mood::Neutral).unwrap().len(), 2);
        assert!(cfg.replies.sad.is_none());
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("MINDMATE_LOCALE", "fr-FR");
        std::env::set_var("MINDMATE_RECOGNIZER_COMMAND", "whisper-once");

        let mut cfg = MindMateConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.speech.locale, "fr-FR");
        assert_eq!(cfg.speech.recognizer.command.as_deref(), Some("whisper-once"));

        // Clean up env vars before testing defaults
        std::env::remove_var("MINDMATE_LOCALE");
        std::env::remove_var("MINDMATE_RECOGNIZER_COMMAND");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = MindMateConfig::load_or_default("/nonexistent/mindmate.toml");
        assert_eq!(cfg.speech.locale, "en-US");
        assert!(cfg.speech.recognizer.command.is_none());
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        let path = MindMateConfig::default_path();
        assert!(path.ends_with("config.toml") || path.ends_with("mindmate.toml"));
    }
}
