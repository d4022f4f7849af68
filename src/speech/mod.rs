//! Speech capability port.
//!
//! The dialogue consumes speech only through [`SpeechPort`]. Requests are
//! fire-and-forget: an implementation answers by sending an [`Event`] tagged
//! with the request's turn back into the reactor's channel, or by never
//! answering at all (the machine's timers cover that).
//!
//! [`Event`]: crate::kernel::event::Event

pub mod console;
pub mod scripted;

use crate::config::SpeechSettings;
use crate::kernel::time::Turn;

pub use console::ConsoleSpeech;
pub use scripted::{PortCall, Reply, ScriptedSpeech};

pub trait SpeechPort: Send {
    /// Bring the engine up. Answer: `PrepareReady`.
    fn prepare(&mut self, settings: &SpeechSettings);

    /// Say `text`. Answer: at most one `SpeakComplete { turn }`.
    fn speak(&mut self, turn: Turn, text: &str);

    /// Open the microphone. Answer: at most one `Recognised { turn, .. }` or
    /// `NoInput { turn }`.
    fn listen(&mut self, turn: Turn);

    /// The dialogue left its listening state; anything heard from now on is
    /// not an answer.
    fn stop_listening(&mut self) {}
}
