use std::time::Duration;

use super::dialogue::{DialogueState, Phase, Slot, BOOKED, GREETING};
use super::event::TimerKind;
use super::state::SessionContext;
use super::time::Turn;
use crate::config::Timings;

pub struct Scheduler;

/// Outbound requests. Executed by the driver, never by the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Bring the speech engine up; it answers with `PrepareReady`
    Prepare,
    Speak { turn: Turn, text: String },
    Listen { turn: Turn },
    /// Deliver `TimerFired { turn, timer }` after `after`
    StartTimer { turn: Turn, timer: TimerKind, after: Duration },
}

impl SideEffect {
    pub fn turn(&self) -> Option<Turn> {
        match self {
            SideEffect::Prepare => None,
            SideEffect::Speak { turn, .. }
            | SideEffect::Listen { turn }
            | SideEffect::StartTimer { turn, .. } => Some(*turn),
        }
    }
}

impl Scheduler {
    /// Pure Projection: entered State + Context -> entry SideEffects.
    /// Every speaking or listening state also arms the timer that rescues it.
    pub fn schedule(
        &self,
        state: &DialogueState,
        ctx: &SessionContext,
        turn: Turn,
        timings: &Timings,
    ) -> Vec<SideEffect> {
        let speak = |text: String| {
            vec![
                SideEffect::Speak { turn, text },
                SideEffect::StartTimer {
                    turn,
                    timer: TimerKind::SpeakTimeout,
                    after: timings.speak_timeout(),
                },
            ]
        };

        match state {
            DialogueState::Prepare => vec![SideEffect::Prepare],
            DialogueState::Intro => speak(GREETING.to_string()),
            DialogueState::Slot { slot, phase: Phase::Prompt } => speak(slot.prompt(ctx)),
            DialogueState::Slot { slot, phase: Phase::WaitBeforeListen } => {
                let after = match slot {
                    Slot::Confirmation => timings.confirmation_listen_delay(),
                    _ => timings.listen_start_delay(),
                };
                vec![SideEffect::StartTimer { turn, timer: TimerKind::ListenStartDelay, after }]
            }
            DialogueState::Slot { phase: Phase::Ask, .. } => vec![
                SideEffect::Listen { turn },
                SideEffect::StartTimer {
                    turn,
                    timer: TimerKind::ListenTimeout,
                    after: timings.listen_timeout(),
                },
            ],
            DialogueState::Pause(_) => vec![SideEffect::StartTimer {
                turn,
                timer: TimerKind::InterPrompt,
                after: timings.inter_prompt_delay(),
            }],
            DialogueState::FinalConfirmation => speak(BOOKED.to_string()),
            DialogueState::WaitToStart
            | DialogueState::ConditionalTime
            | DialogueState::Done
            | DialogueState::Abandoned { .. } => Vec::new(),
        }
    }
}
