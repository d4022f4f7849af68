//! Dialogue telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (guards, transition table, reducer).
//! It exists solely for observability and verification.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (utterances, names, dates).
//! Only states, slot kinds, turns, counts and appointment IDs are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
