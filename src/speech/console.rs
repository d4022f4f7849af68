use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::SpeechPort;
use crate::config::SpeechSettings;
use crate::kernel::event::{Candidate, Event};
use crate::kernel::time::Turn;

/// Terminal stand-in for a speech engine.
///
/// Prompts are printed, answers are typed. A line typed while the microphone
/// is open is the recognition result (an empty line counts as no input); a
/// line typed while it is closed acts as the start click.
pub struct ConsoleSpeech {
    tx: mpsc::Sender<Event>,
    listening: Arc<Mutex<Option<Turn>>>,
}

impl ConsoleSpeech {
    /// Create the port and spawn the stdin reader. Must run inside a runtime.
    pub fn spawn(tx: mpsc::Sender<Event>) -> Self {
        let port = Self::new(tx);
        tokio::spawn(read_lines(port.tx.clone(), port.listening.clone()));
        port
    }

    fn new(tx: mpsc::Sender<Event>) -> Self {
        Self {
            tx,
            listening: Arc::new(Mutex::new(None)),
        }
    }

    fn send(&self, event: Event) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(event).await;
        });
    }
}

impl SpeechPort for ConsoleSpeech {
    fn prepare(&mut self, settings: &SpeechSettings) {
        info!(
            locale = %settings.locale,
            voice = %settings.voice,
            no_input_timeout_ms = settings.no_input_timeout_ms,
            "Console speech ready"
        );
        println!("Press Enter to start.");
        self.send(Event::PrepareReady);
    }

    fn speak(&mut self, turn: Turn, text: &str) {
        println!("SYSTEM: {}", text);
        self.send(Event::SpeakComplete { turn });
    }

    fn listen(&mut self, turn: Turn) {
        debug!(turn = turn.generation, "Microphone open");
        set_listening(&self.listening, Some(turn));
        println!("(listening...)");
    }

    fn stop_listening(&mut self) {
        if set_listening(&self.listening, None).is_some() {
            debug!("Microphone closed");
        }
    }
}

fn set_listening(slot: &Mutex<Option<Turn>>, turn: Option<Turn>) -> Option<Turn> {
    let mut guard = match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    std::mem::replace(&mut *guard, turn)
}

async fn read_lines(tx: mpsc::Sender<Event>, listening: Arc<Mutex<Option<Turn>>>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line_event(&listening, &line)).await.is_err() {
            break;
        }
    }
}

/// Map a typed line to an event. Taking the turn closes the microphone: one
/// answer per listen.
fn line_event(listening: &Mutex<Option<Turn>>, line: &str) -> Event {
    match set_listening(listening, None) {
        Some(turn) if line.trim().is_empty() => Event::NoInput { turn },
        Some(turn) => Event::Recognised {
            turn,
            candidates: vec![Candidate::new(line.trim(), 1.0)],
        },
        None => Event::Start,
    }
}
