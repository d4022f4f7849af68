use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::dialogue::{DialogueState, Slot};
use crate::kernel::time::Turn;
use crate::kernel::transition::ReaskCause;

// Allowed: States, Slot kinds, Turns, Counts, IDs
// Forbidden: Utterances, resolved values, prompt text

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Transition {
        from: DialogueState,
        to: DialogueState,
        turn: Turn,
    },

    SlotFilled {
        slot: Slot,
        attempts: u32, // including the successful one
    },

    Reask {
        slot: Slot,
        cause: ReaskCause,
        failures: u32,
    },

    RetriesExhausted {
        slot: Slot,
    },

    /// An event for a turn that has already been left
    StaleEventDiscarded {
        current: Turn,
        received: Turn,
    },

    AppointmentBooked {
        id: Uuid,
        full_day: bool,
    },
}
