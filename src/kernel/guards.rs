//! Guards: side-effect-free predicates deciding which transition fires.
//!
//! Nothing here logs. Tracing happens in the machine once a transition has
//! been chosen.

use super::dialogue::Slot;
use super::state::SessionContext;
use crate::lexicon::{Lexicon, LexiconEntry};

/// Resolve the utterance for `slot`. `None` covers both "no match" and a
/// result without a usable utterance.
pub fn resolve(lexicon: &Lexicon, slot: Slot, utterance: Option<&str>) -> Option<LexiconEntry> {
    utterance.and_then(|u| lexicon.resolve(slot.entry_kind(), u))
}

pub fn is_recognised(lexicon: &Lexicon, slot: Slot, utterance: Option<&str>) -> bool {
    resolve(lexicon, slot, utterance).is_some()
}

/// Exact complement of [`is_recognised`]; exactly one of the two holds.
pub fn is_not_recognised(lexicon: &Lexicon, slot: Slot, utterance: Option<&str>) -> bool {
    !is_recognised(lexicon, slot, utterance)
}

pub fn is_full_day(ctx: &SessionContext) -> bool {
    ctx.full_day
}
