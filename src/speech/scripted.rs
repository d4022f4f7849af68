use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use super::SpeechPort;
use crate::config::SpeechSettings;
use crate::kernel::event::Event;
use crate::kernel::time::Turn;

/// What the scripted user does when the microphone opens.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Say(String),
    NoInput,
    /// Say nothing; the engine reports no input after its own timeout
    Quiet,
    /// Never answer; the listen timeout has to fire
    Silence,
}

impl Reply {
    pub fn say(utterance: &str) -> Self {
        Reply::Say(utterance.to_string())
    }
}

/// Request as seen by the port, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    Prepare,
    Speak(String),
    Listen,
    StopListening,
}

/// Deterministic port for tests and demos. Replies are consumed one per
/// listen; once they run out the user stays silent.
pub struct ScriptedSpeech {
    tx: mpsc::Sender<Event>,
    replies: VecDeque<Reply>,
    calls: Arc<Mutex<Vec<PortCall>>>,
    mute: bool,
    no_input_after: Duration,
}

impl ScriptedSpeech {
    pub fn new(tx: mpsc::Sender<Event>, replies: Vec<Reply>) -> Self {
        Self {
            tx,
            replies: replies.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
            mute: false,
            no_input_after: Duration::from_millis(SpeechSettings::default().no_input_timeout_ms),
        }
    }

    /// Speech never reports completion; prompts only advance on speak-timeout.
    pub fn muted(mut self) -> Self {
        self.mute = true;
        self
    }

    /// Shared handle to the call log, readable after the port moved into a reactor.
    pub fn calls(&self) -> Arc<Mutex<Vec<PortCall>>> {
        self.calls.clone()
    }

    fn log(&self, call: PortCall) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }

    fn send(&self, event: Event) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(event).await;
        });
    }
}

impl SpeechPort for ScriptedSpeech {
    // The scripted user clicks start as soon as the engine is ready.
    fn prepare(&mut self, settings: &SpeechSettings) {
        self.log(PortCall::Prepare);
        self.no_input_after = Duration::from_millis(settings.no_input_timeout_ms);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tx.send(Event::PrepareReady).await.is_ok() {
                let _ = tx.send(Event::Start).await;
            }
        });
    }

    fn speak(&mut self, turn: Turn, text: &str) {
        self.log(PortCall::Speak(text.to_string()));
        if !self.mute {
            self.send(Event::SpeakComplete { turn });
        }
    }

    fn listen(&mut self, turn: Turn) {
        self.log(PortCall::Listen);
        match self.replies.pop_front().unwrap_or(Reply::Silence) {
            Reply::Say(utterance) => self.send(Event::recognised(turn, &utterance)),
            Reply::NoInput => self.send(Event::NoInput { turn }),
            Reply::Quiet => {
                let tx = self.tx.clone();
                let after = self.no_input_after;
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Event::NoInput { turn }).await;
                });
            }
            Reply::Silence => {}
        }
    }

    fn stop_listening(&mut self) {
        self.log(PortCall::StopListening);
    }
}
