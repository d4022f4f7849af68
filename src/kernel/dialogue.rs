use serde::{Deserialize, Serialize};

use super::state::SessionContext;
use crate::lexicon::EntryKind;

pub const GREETING: &str = "Hi Let's create an appointment.";
pub const BOOKED: &str = "Your appointment has been created.";

/// One piece of information collected by a Prompt/Delay/Listen group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Person,
    Date,
    FullDay,
    Time,
    /// Yes/no acknowledgement of the collected appointment
    Confirmation,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Person,
        Slot::Date,
        Slot::FullDay,
        Slot::Time,
        Slot::Confirmation,
    ];

    /// Lexicon rows consulted for this slot.
    pub fn entry_kind(self) -> EntryKind {
        match self {
            Slot::Person => EntryKind::Person,
            Slot::Date => EntryKind::Day,
            Slot::Time => EntryKind::Time,
            Slot::FullDay | Slot::Confirmation => EntryKind::Answer,
        }
    }

    /// Re-asks repeat this text verbatim.
    pub fn prompt(self, ctx: &SessionContext) -> String {
        match self {
            Slot::Person => "Who are you meeting with?".to_string(),
            Slot::Date => "On which day is your meeting?".to_string(),
            Slot::FullDay => "Will it take the whole day?".to_string(),
            Slot::Time => "What time is your meeting?".to_string(),
            Slot::Confirmation if ctx.full_day => format!(
                "Do you want me to create an appointment with {} on {} for the whole day?",
                ctx.meeting_person, ctx.meeting_date
            ),
            Slot::Confirmation => format!(
                "Do you want me to create an appointment with {} on {} at {}?",
                ctx.meeting_person, ctx.meeting_date, ctx.meeting_time
            ),
        }
    }

    fn group(self) -> &'static str {
        match self {
            Slot::Person => "AskPerson",
            Slot::Date => "AskDate",
            Slot::FullDay => "AskFullDay",
            Slot::Time => "AskTime",
            Slot::Confirmation => "ConfirmationListen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Speaking the prompt
    Prompt,
    /// Microphone debounce
    WaitBeforeListen,
    /// Listening for an answer
    Ask,
}

/// Where a pause leads once it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Ask(Slot),
    FinalConfirmation,
}

/// Flat dialogue state. Slot groups share the Prompt/Delay/Listen template
/// instead of nesting one sub-machine per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogueState {
    Prepare,
    WaitToStart,
    /// Greeting announcement
    Intro,
    Slot { slot: Slot, phase: Phase },
    Pause(Stage),
    /// Transient: resolved as soon as it is entered
    ConditionalTime,
    FinalConfirmation,
    Done,
    /// Retry policy ran out while asking `slot`
    Abandoned { slot: Slot },
}

impl Default for DialogueState {
    fn default() -> Self {
        Self::Prepare
    }
}

impl DialogueState {
    pub fn ask(slot: Slot) -> Self {
        DialogueState::Slot { slot, phase: Phase::Prompt }
    }

    /// Hierarchical label for a host UI, e.g. `Greeting.AskPerson.Prompt`.
    pub fn label(&self, ctx: &SessionContext) -> String {
        match self {
            DialogueState::Prepare => "Prepare".to_string(),
            DialogueState::WaitToStart => "WaitToStart".to_string(),
            DialogueState::Intro => "Greeting.Start".to_string(),
            DialogueState::Slot { slot: Slot::Confirmation, phase: Phase::Prompt } => {
                if ctx.full_day {
                    "Greeting.ConfirmFullDay".to_string()
                } else {
                    "Greeting.ConfirmAppointment".to_string()
                }
            }
            DialogueState::Slot { slot, phase } => {
                format!("Greeting.{}.{:?}", slot.group(), phase)
            }
            DialogueState::Pause(Stage::Ask(Slot::Confirmation)) => {
                "Greeting.WaitBeforeConfirmAppointment".to_string()
            }
            DialogueState::Pause(Stage::Ask(slot)) => {
                format!("Greeting.WaitBefore{}", slot.group())
            }
            DialogueState::Pause(Stage::FinalConfirmation) => {
                "Greeting.WaitBeforeFinalConfirmation".to_string()
            }
            DialogueState::ConditionalTime => "Greeting.ConditionalTime".to_string(),
            DialogueState::FinalConfirmation => "Greeting.FinalConfirmation".to_string(),
            DialogueState::Done => "Greeting.Done".to_string(),
            DialogueState::Abandoned { slot } => format!("Greeting.{}.Abandoned", slot.group()),
        }
    }
}
