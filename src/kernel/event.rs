use serde::{Deserialize, Serialize};

use super::time::Turn;

/// One recognition hypothesis. Only the first candidate of a result is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub utterance: String,
    pub confidence: f32,
}

impl Candidate {
    pub fn new(utterance: &str, confidence: f32) -> Self {
        Self {
            utterance: utterance.to_string(),
            confidence,
        }
    }
}

/// Which timer expired. Timers are scoped to the state that started them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Speak completion never arrived
    SpeakTimeout,
    /// Debounce before listening
    ListenStartDelay,
    /// No recognition within the listen window
    ListenTimeout,
    /// Pause between slots
    InterPrompt,
}

/// Everything the machine can be told.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Speech engine is ready
    PrepareReady,
    /// User start signal (click, key press)
    Start,
    SpeakComplete { turn: Turn },
    Recognised { turn: Turn, candidates: Vec<Candidate> },
    NoInput { turn: Turn },
    TimerFired { turn: Turn, timer: TimerKind },
}

// Helpers for the common single-candidate case
impl Event {
    pub fn recognised(turn: Turn, utterance: &str) -> Self {
        Event::Recognised {
            turn,
            candidates: vec![Candidate::new(utterance, 1.0)],
        }
    }

    /// The turn this event answers, if it answers one.
    pub fn turn(&self) -> Option<Turn> {
        match self {
            Event::PrepareReady | Event::Start => None,
            Event::SpeakComplete { turn }
            | Event::Recognised { turn, .. }
            | Event::NoInput { turn }
            | Event::TimerFired { turn, .. } => Some(*turn),
        }
    }
}

/// Turn-free view of an event, after stale ones have been dropped.
/// This is what the transition table matches on.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    PrepareReady,
    Start,
    SpeakComplete,
    /// `None` when the result carried no usable utterance
    Recognised(Option<String>),
    NoInput,
    Timer(TimerKind),
}

impl From<Event> for Signal {
    fn from(event: Event) -> Self {
        match event {
            Event::PrepareReady => Signal::PrepareReady,
            Event::Start => Signal::Start,
            Event::SpeakComplete { .. } => Signal::SpeakComplete,
            Event::Recognised { candidates, .. } => Signal::Recognised(
                candidates
                    .into_iter()
                    .next()
                    .map(|c| c.utterance)
                    .filter(|u| !u.trim().is_empty()),
            ),
            Event::NoInput { .. } => Signal::NoInput,
            Event::TimerFired { timer, .. } => Signal::Timer(timer),
        }
    }
}
