use serde::Serialize;
use tracing::{debug, info, warn};

use super::dialogue::{DialogueState, Phase};
use super::event::{Event, Signal};
use super::scheduler::{Scheduler, SideEffect};
use super::state::{Appointment, SessionContext};
use super::telemetry::event::TelemetryEvent;
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Turn;
use super::transition::{self, Cause, Transition};
use crate::config::DialogueConfig;
use crate::lexicon::Lexicon;

/// The request the current state is waiting on. At most one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PendingRequest {
    Speak,
    Listen,
}

/// Read-only export for a host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueSnapshot {
    pub state: String,
    pub turn: Turn,
    pub context: SessionContext,
    pub booked: Vec<Appointment>,
}

/// Single-instance, single-threaded slot-filling automaton.
///
/// `step` is the only entry point for events. It never awaits and never
/// performs I/O; everything outbound is returned as [`SideEffect`]s.
pub struct DialogueMachine {
    config: DialogueConfig,
    lexicon: Lexicon,
    scheduler: Scheduler,
    state: DialogueState,
    context: SessionContext,
    turn: Turn,
    // Consecutive failed attempts on the active slot
    failures: u32,
    booked: Vec<Appointment>,
    pub telemetry: TelemetryRecorder,
    booted: bool,
}

impl DialogueMachine {
    pub fn new(config: DialogueConfig, lexicon: Lexicon) -> Self {
        Self {
            config,
            lexicon,
            scheduler: Scheduler,
            state: DialogueState::Prepare,
            context: SessionContext::new(),
            turn: Turn::new(),
            failures: 0,
            booked: Vec::new(),
            telemetry: TelemetryRecorder::new(),
            booted: false,
        }
    }

    /// Enter the initial state. Idempotent.
    pub fn boot(&mut self) -> Vec<SideEffect> {
        if self.booted {
            return Vec::new();
        }
        self.booted = true;
        self.turn = self.turn.next();
        info!(state = %self.label(), "Dialogue booted");
        self.scheduler
            .schedule(&self.state, &self.context, self.turn, &self.config.timings)
    }

    /// Process one event. Returns SideEffects to be executed by the driver.
    ///
    /// **TURN LAW**: an event tagged with any turn other than the current one
    /// is discarded before it reaches the transition table.
    pub fn step(&mut self, event: Event) -> Vec<SideEffect> {
        if !self.booted {
            let mut effects = self.boot();
            effects.extend(self.step(event));
            return effects;
        }

        if let Some(received) = event.turn() {
            if received != self.turn {
                warn!(
                    current = self.turn.generation,
                    received = received.generation,
                    "Discarded stale event"
                );
                self.telemetry.record(TelemetryEvent::StaleEventDiscarded {
                    current: self.turn,
                    received,
                });
                return Vec::new();
            }
        }

        let signal = Signal::from(event);
        match transition::transition(&self.state, &signal, &self.lexicon) {
            Some(t) => self.apply(t),
            None => {
                debug!(state = %self.label(), ?signal, "Ignored signal");
                Vec::new()
            }
        }
    }

    fn apply(&mut self, t: Transition) -> Vec<SideEffect> {
        let Transition { mut target, delta, cause } = t;

        if let Some(delta) = delta {
            self.context = std::mem::take(&mut self.context).reduce(delta);
        }

        match cause {
            Cause::Filled(slot) => {
                let attempts = self.failures + 1;
                self.failures = 0;
                info!(?slot, attempts, "Slot filled");
                self.telemetry.record(TelemetryEvent::SlotFilled { slot, attempts });
            }
            Cause::Reask(slot, reason) => {
                self.failures += 1;
                info!(?slot, ?reason, failures = self.failures, "Re-asking");
                self.telemetry.record(TelemetryEvent::Reask {
                    slot,
                    cause: reason,
                    failures: self.failures,
                });
                if !self.config.retry.allows_retry(self.failures) {
                    warn!(
                        ?slot,
                        failures = self.failures,
                        "Retry limit reached, abandoning dialogue"
                    );
                    self.telemetry.record(TelemetryEvent::RetriesExhausted { slot });
                    target = DialogueState::Abandoned { slot };
                }
            }
            Cause::Restart => self.failures = 0,
            _ => {}
        }

        self.enter(target, cause)
    }

    /// Enter `target`, running through transient states, and project the
    /// entry effects of the state the machine finally rests in.
    fn enter(&mut self, mut target: DialogueState, mut cause: Cause) -> Vec<SideEffect> {
        loop {
            let from = self.state;
            self.state = target;
            self.turn = self.turn.next();
            self.observe(from, cause);

            if from == DialogueState::FinalConfirmation && target == DialogueState::Done {
                self.book();
            }

            match transition::resolve_transient(&self.state, &self.context) {
                Some(next) => {
                    target = next.target;
                    cause = next.cause;
                }
                None => break,
            }
        }

        let effects = self
            .scheduler
            .schedule(&self.state, &self.context, self.turn, &self.config.timings);
        debug!(state = %self.label(), ?effects, "Entry effects");
        effects
    }

    // Observer: tracing + telemetry, outside of any guard.
    fn observe(&mut self, from: DialogueState, cause: Cause) {
        info!(
            from = %from.label(&self.context),
            to = %self.label(),
            turn = self.turn.generation,
            ?cause,
            "Transition"
        );
        self.telemetry.record(TelemetryEvent::Transition {
            from,
            to: self.state,
            turn: self.turn,
        });
    }

    fn book(&mut self) {
        let appointment = Appointment::from_context(&self.context);
        info!(id = %appointment.id, full_day = appointment.full_day, "Appointment booked");
        self.telemetry.record(TelemetryEvent::AppointmentBooked {
            id: appointment.id,
            full_day: appointment.full_day,
        });
        self.booked.push(appointment);
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn label(&self) -> String {
        self.state.label(&self.context)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn booked(&self) -> &[Appointment] {
        &self.booked
    }

    pub fn pending(&self) -> Option<PendingRequest> {
        match self.state {
            DialogueState::Intro
            | DialogueState::FinalConfirmation
            | DialogueState::Slot { phase: Phase::Prompt, .. } => Some(PendingRequest::Speak),
            DialogueState::Slot { phase: Phase::Ask, .. } => Some(PendingRequest::Listen),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, DialogueState::Done | DialogueState::Abandoned { .. })
    }

    pub fn snapshot(&self) -> DialogueSnapshot {
        DialogueSnapshot {
            state: self.label(),
            turn: self.turn,
            context: self.context.clone(),
            booked: self.booked.clone(),
        }
    }
}
