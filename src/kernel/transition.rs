use serde::{Deserialize, Serialize};

use super::dialogue::{DialogueState, Phase, Slot, Stage};
use super::event::{Signal, TimerKind};
use super::guards;
use super::state::{ContextDelta, SessionContext};
use crate::lexicon::Lexicon;

/// Why a slot is being asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReaskCause {
    NotRecognised,
    NoInput,
    ListenTimeout,
}

/// Why a transition fired. Consumed by the observer, never by guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    EngineReady,
    StartRequested,
    SpeechFinished,
    SpeakTimedOut,
    DelayElapsed,
    Filled(Slot),
    Reask(Slot, ReaskCause),
    /// Unconditional branch out of a transient state
    Branch,
    Restart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub target: DialogueState,
    pub delta: Option<ContextDelta>,
    pub cause: Cause,
}

impl Transition {
    fn to(target: DialogueState, cause: Cause) -> Self {
        Self { target, delta: None, cause }
    }

    fn reask(slot: Slot, cause: ReaskCause) -> Self {
        Self {
            target: DialogueState::ask(slot),
            delta: Some(ContextDelta::Reask),
            cause: Cause::Reask(slot, cause),
        }
    }
}

/// Flat transition table: (State, Signal, Guards) -> Transition.
/// Returns None when no transition matches; the signal is then ignored.
pub fn transition(
    state: &DialogueState,
    signal: &Signal,
    lexicon: &Lexicon,
) -> Option<Transition> {
    match (state, signal) {
        (DialogueState::Prepare, Signal::PrepareReady) => {
            Some(Transition::to(DialogueState::WaitToStart, Cause::EngineReady))
        }
        (DialogueState::WaitToStart, Signal::Start) => {
            Some(Transition::to(DialogueState::Intro, Cause::StartRequested))
        }

        // --- Speaking states: completion or timeout, whichever comes first ---
        (DialogueState::Intro, s) => after_speech(s, DialogueState::ask(Slot::Person)),
        (DialogueState::Slot { slot, phase: Phase::Prompt }, s) => after_speech(
            s,
            DialogueState::Slot { slot: *slot, phase: Phase::WaitBeforeListen },
        ),
        (DialogueState::FinalConfirmation, s) => after_speech(s, DialogueState::Done),

        // --- Debounce ---
        (
            DialogueState::Slot { slot, phase: Phase::WaitBeforeListen },
            Signal::Timer(TimerKind::ListenStartDelay),
        ) => Some(Transition::to(
            DialogueState::Slot { slot: *slot, phase: Phase::Ask },
            Cause::DelayElapsed,
        )),

        // --- Listening: keyed by guard result ---
        (DialogueState::Slot { slot, phase: Phase::Ask }, Signal::Recognised(utterance))
            if guards::is_recognised(lexicon, *slot, utterance.as_deref()) =>
        {
            let utterance = utterance.as_deref();
            guards::resolve(lexicon, *slot, utterance).map(|value| Transition {
                target: after_fill(*slot),
                delta: Some(ContextDelta::SlotFilled {
                    slot: *slot,
                    value,
                    utterance: utterance.unwrap_or_default().to_string(),
                }),
                cause: Cause::Filled(*slot),
            })
        }
        (DialogueState::Slot { slot, phase: Phase::Ask }, Signal::Recognised(utterance))
            if guards::is_not_recognised(lexicon, *slot, utterance.as_deref()) =>
        {
            Some(Transition::reask(*slot, ReaskCause::NotRecognised))
        }
        (DialogueState::Slot { slot, phase: Phase::Ask }, Signal::NoInput) => {
            Some(Transition::reask(*slot, ReaskCause::NoInput))
        }
        (
            DialogueState::Slot { slot, phase: Phase::Ask },
            Signal::Timer(TimerKind::ListenTimeout),
        ) => Some(Transition::reask(*slot, ReaskCause::ListenTimeout)),

        (DialogueState::Pause(stage), Signal::Timer(TimerKind::InterPrompt)) => {
            let target = match stage {
                Stage::Ask(slot) => DialogueState::ask(*slot),
                Stage::FinalConfirmation => DialogueState::FinalConfirmation,
            };
            Some(Transition::to(target, Cause::DelayElapsed))
        }

        // --- Book another appointment with the same context ---
        (DialogueState::Done, Signal::Start) | (DialogueState::Abandoned { .. }, Signal::Start) => {
            Some(Transition::to(DialogueState::ask(Slot::Person), Cause::Restart))
        }

        _ => None,
    }
}

/// Always-evaluated branch for transient states. Returns None for states
/// that wait for a signal.
pub fn resolve_transient(state: &DialogueState, ctx: &SessionContext) -> Option<Transition> {
    match state {
        DialogueState::ConditionalTime => {
            let target = if guards::is_full_day(ctx) {
                // Straight to the full-day confirmation, time is never asked.
                DialogueState::ask(Slot::Confirmation)
            } else {
                DialogueState::Pause(Stage::Ask(Slot::Time))
            };
            Some(Transition::to(target, Cause::Branch))
        }
        _ => None,
    }
}

fn after_speech(signal: &Signal, target: DialogueState) -> Option<Transition> {
    match signal {
        Signal::SpeakComplete => Some(Transition::to(target, Cause::SpeechFinished)),
        Signal::Timer(TimerKind::SpeakTimeout) => {
            Some(Transition::to(target, Cause::SpeakTimedOut))
        }
        _ => None,
    }
}

fn after_fill(slot: Slot) -> DialogueState {
    match slot {
        Slot::Person => DialogueState::Pause(Stage::Ask(Slot::Date)),
        Slot::Date => DialogueState::Pause(Stage::Ask(Slot::FullDay)),
        Slot::FullDay => DialogueState::ConditionalTime,
        Slot::Time => DialogueState::Pause(Stage::Ask(Slot::Confirmation)),
        // Both "yes" and "no" land here; see DESIGN.md.
        Slot::Confirmation => DialogueState::Pause(Stage::FinalConfirmation),
    }
}
