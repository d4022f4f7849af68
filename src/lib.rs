pub mod config;
pub mod error;
pub mod kernel;
pub mod lexicon;
pub mod speech;

// Re-export specific items for convenient access
pub use config::DialogueConfig;
pub use error::{DialogueError, Result};
pub use kernel::machine::{DialogueMachine, DialogueSnapshot};
pub use kernel::reactor::Reactor;
pub use lexicon::{EntryKind, Lexicon, LexiconEntry};
