//! Error types for the appointment dialogue manager.
//!
//! Only setup and plumbing can fail. Recognition problems inside a running
//! dialogue are transitions, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogueError {
    /// Config or lexicon file could not be read
    #[error("Failed to read {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    ConfigParse(#[source] serde_json::Error),

    #[error("Invalid lexicon JSON: {0}")]
    LexiconParse(#[source] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The event channel feeding the reactor closed while it was running
    #[error("Event channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, DialogueError>;
