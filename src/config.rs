//! Configuration for the dialogue manager.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DialogueError, Result};
use crate::kernel::retry::RetryPolicy;
use crate::kernel::time::{
    CONFIRMATION_LISTEN_DELAY_MS, INTER_PROMPT_DELAY_MS, LISTEN_START_DELAY_MS,
    LISTEN_TIMEOUT_MS, SPEAK_TIMEOUT_MS,
};
use crate::lexicon::Lexicon;

/// Timer lengths, all in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Give up waiting for a speak completion after this long
    pub speak_timeout_ms: u64,
    /// Debounce between the end of a prompt and opening the microphone
    pub listen_start_delay_ms: u64,
    /// Re-ask if nothing is recognised within this window
    pub listen_timeout_ms: u64,
    /// Pause between a filled slot and the next prompt
    pub inter_prompt_delay_ms: u64,
    /// Debounce before listening for the confirmation answer
    pub confirmation_listen_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            speak_timeout_ms: SPEAK_TIMEOUT_MS,
            listen_start_delay_ms: LISTEN_START_DELAY_MS,
            listen_timeout_ms: LISTEN_TIMEOUT_MS,
            inter_prompt_delay_ms: INTER_PROMPT_DELAY_MS,
            confirmation_listen_delay_ms: CONFIRMATION_LISTEN_DELAY_MS,
        }
    }
}

impl Timings {
    pub fn speak_timeout(&self) -> Duration {
        Duration::from_millis(self.speak_timeout_ms)
    }

    pub fn listen_start_delay(&self) -> Duration {
        Duration::from_millis(self.listen_start_delay_ms)
    }

    pub fn listen_timeout(&self) -> Duration {
        Duration::from_millis(self.listen_timeout_ms)
    }

    pub fn inter_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.inter_prompt_delay_ms)
    }

    pub fn confirmation_listen_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_listen_delay_ms)
    }
}

/// Settings handed to the speech engine when it is prepared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub locale: String,
    pub voice: String,
    /// Engine-side silence window before it reports no input
    pub no_input_timeout_ms: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            voice: "en-US-DavisNeural".to_string(),
            no_input_timeout_ms: 5000,
        }
    }
}

/// Dialogue manager configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub timings: Timings,
    pub retry: RetryPolicy,
    pub speech: SpeechSettings,
    /// Replace the built-in vocabulary with a JSON table
    pub lexicon_path: Option<PathBuf>,
}

impl DialogueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(DialogueError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| DialogueError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Builder: set all timings
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Builder: bound consecutive failed attempts per slot
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.retry = RetryPolicy::bounded(attempts);
        self
    }

    /// Builder: set speech engine settings
    pub fn with_speech(mut self, speech: SpeechSettings) -> Self {
        self.speech = speech;
        self
    }

    /// Builder: load the vocabulary from a file
    pub fn with_lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.timings;
        if t.speak_timeout_ms == 0 || t.listen_timeout_ms == 0 {
            return Err(DialogueError::InvalidConfig(
                "speak and listen timeouts must be non-zero".to_string(),
            ));
        }
        if self.retry.max_attempts == Some(0) {
            return Err(DialogueError::InvalidConfig(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured vocabulary, or the built-in one.
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_json_file(path),
            None => Ok(Lexicon::default()),
        }
    }
}
