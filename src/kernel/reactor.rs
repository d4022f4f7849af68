use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::event::Event;
use super::machine::{DialogueMachine, DialogueSnapshot, PendingRequest};
use super::scheduler::SideEffect;
use super::time::Turn;
use crate::config::SpeechSettings;
use crate::error::{DialogueError, Result};
use crate::speech::SpeechPort;

/// Async driver around a [`DialogueMachine`].
///
/// Events are processed one at a time in arrival order. The machine decides,
/// the reactor executes: speech requests go to the port, timers become tokio
/// tasks that post `TimerFired` back into the same channel.
pub struct Reactor<P: SpeechPort> {
    pub receiver: mpsc::Receiver<Event>,
    // Weak so that pending timers alone do not keep the channel open
    timer_tx: mpsc::WeakSender<Event>,
    pub machine: DialogueMachine,
    port: P,
    speech: SpeechSettings,
    timers: Vec<(Turn, JoinHandle<()>)>,
    snapshots: watch::Sender<DialogueSnapshot>,
}

impl<P: SpeechPort> Reactor<P> {
    pub fn new(
        receiver: mpsc::Receiver<Event>,
        tx: &mpsc::Sender<Event>,
        machine: DialogueMachine,
        port: P,
        speech: SpeechSettings,
    ) -> Self {
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self {
            receiver,
            timer_tx: tx.downgrade(),
            machine,
            port,
            speech,
            timers: Vec::new(),
            snapshots,
        }
    }

    /// Follow state and context changes (host UI).
    pub fn subscribe(&self) -> watch::Receiver<DialogueSnapshot> {
        self.snapshots.subscribe()
    }

    /// Feed one event through the machine and execute what it decides.
    pub fn handle(&mut self, event: Event) {
        let was_listening = self.machine.pending() == Some(PendingRequest::Listen);
        let effects = self.machine.step(event);
        if was_listening && self.machine.pending() != Some(PendingRequest::Listen) {
            self.port.stop_listening();
        }
        self.dispatch(effects);
    }

    /// Execute side effects. Timers from turns the machine has left are torn
    /// down first.
    pub fn dispatch(&mut self, effects: Vec<SideEffect>) {
        let current = self.machine.turn();
        self.timers.retain(|(turn, handle)| {
            if *turn == current {
                true
            } else {
                handle.abort();
                false
            }
        });

        for effect in effects {
            match effect {
                SideEffect::Prepare => self.port.prepare(&self.speech),
                SideEffect::Speak { turn, text } => self.port.speak(turn, &text),
                SideEffect::Listen { turn } => self.port.listen(turn),
                SideEffect::StartTimer { turn, timer, after } => {
                    let Some(tx) = self.timer_tx.upgrade() else {
                        continue;
                    };
                    debug!(turn = turn.generation, ?timer, ?after, "Timer armed");
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = tx.send(Event::TimerFired { turn, timer }).await;
                    });
                    self.timers.push((turn, handle));
                }
            }
        }

        self.snapshots.send_replace(self.machine.snapshot());
    }

    /// Driver loop. Runs until `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<()> {
        info!("Dialogue reactor started");
        let effects = self.machine.boot();
        self.dispatch(effects);

        let outcome = loop {
            tokio::select! {
                _ = shutdown.cancelled() => break Ok(()),
                event = self.receiver.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break Err(DialogueError::ChannelClosed),
                },
            }
        };

        for (_, handle) in self.timers.drain(..) {
            handle.abort();
        }
        info!(booked = self.machine.booked().len(), "Dialogue reactor stopped");
        outcome
    }
}
