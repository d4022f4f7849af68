use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dialogue::Slot;
use crate::lexicon::LexiconEntry;

/// What has been collected so far. Owned by exactly one running dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub meeting_person: String,
    pub meeting_date: String,
    /// Stays empty for a full-day meeting
    pub meeting_time: String,
    pub full_day: bool,
    /// Utterance that filled the most recent slot. Cleared on every re-ask.
    pub last_recognition_result: Option<String>,
}

/// Strict context delta. This is the ONLY way the context changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextDelta {
    /// A slot's recognised-guard held: write the resolved value.
    SlotFilled {
        slot: Slot,
        value: LexiconEntry,
        utterance: String,
    },
    /// Failed or absent recognition: forget the last result.
    Reask,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reduction: Context + Delta -> Context.
    ///
    /// Total over all inputs. A value of the wrong kind for the slot leaves the
    /// slot fields untouched so a field is never partially written.
    pub fn reduce(mut self, delta: ContextDelta) -> SessionContext {
        match delta {
            ContextDelta::Reask => {
                self.last_recognition_result = None;
            }
            ContextDelta::SlotFilled { slot, value, utterance } => {
                match (slot, value) {
                    (Slot::Person, LexiconEntry::Person(name)) => self.meeting_person = name,
                    (Slot::Date, LexiconEntry::Day(day)) => self.meeting_date = day,
                    (Slot::Time, LexiconEntry::Time(time)) => self.meeting_time = time,
                    (Slot::FullDay, LexiconEntry::Answer(full_day)) => {
                        self.full_day = full_day;
                        if full_day {
                            // A time left over from an earlier booking must not survive.
                            self.meeting_time.clear();
                        }
                    }
                    // The answer is only an acknowledgement.
                    (Slot::Confirmation, LexiconEntry::Answer(_)) => {}
                    _ => return self,
                }
                self.last_recognition_result = Some(utterance);
            }
        }
        self
    }
}

/// A confirmed booking. Lives only as long as the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub person: String,
    pub date: String,
    /// `None` for a full-day appointment
    pub time: Option<String>,
    pub full_day: bool,
}

impl Appointment {
    pub fn from_context(ctx: &SessionContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            person: ctx.meeting_person.clone(),
            date: ctx.meeting_date.clone(),
            time: (!ctx.full_day).then(|| ctx.meeting_time.clone()),
            full_day: ctx.full_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_field_and_last_result() {
        let ctx = SessionContext::new().reduce(ContextDelta::SlotFilled {
            slot: Slot::Person,
            value: LexiconEntry::Person("John Doe".into()),
            utterance: "john".into(),
        });
        assert_eq!(ctx.meeting_person, "John Doe");
        assert_eq!(ctx.last_recognition_result.as_deref(), Some("john"));

        let ctx = ctx.reduce(ContextDelta::Reask);
        assert_eq!(ctx.meeting_person, "John Doe");
        assert!(ctx.last_recognition_result.is_none());
    }

    #[test]
    fn mismatched_value_is_ignored() {
        let before = SessionContext::new();
        let after = before.clone().reduce(ContextDelta::SlotFilled {
            slot: Slot::Date,
            value: LexiconEntry::Person("Emma Watson".into()),
            utterance: "emma".into(),
        });
        assert_eq!(before, after);
    }

    #[test]
    fn full_day_clears_previous_time() {
        let ctx = SessionContext {
            meeting_time: "10:00".into(),
            ..SessionContext::default()
        };
        let ctx = ctx.reduce(ContextDelta::SlotFilled {
            slot: Slot::FullDay,
            value: LexiconEntry::Answer(true),
            utterance: "yes".into(),
        });
        assert!(ctx.full_day);
        assert!(ctx.meeting_time.is_empty());
    }
}
