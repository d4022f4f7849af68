use serde::{Deserialize, Serialize};

/// Generation counter. Bumped on every state entry; anything tagged with an
/// older turn belongs to a state that has already been left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub generation: u64,
}

pub const SPEAK_TIMEOUT_MS: u64 = 5000;
pub const LISTEN_START_DELAY_MS: u64 = 1000;
pub const LISTEN_TIMEOUT_MS: u64 = 6000;
pub const INTER_PROMPT_DELAY_MS: u64 = 500;
pub const CONFIRMATION_LISTEN_DELAY_MS: u64 = INTER_PROMPT_DELAY_MS;

impl Turn {
    pub fn new() -> Self {
        Turn { generation: 0 }
    }

    pub fn next(&self) -> Self {
        Turn { generation: self.generation + 1 }
    }
}
