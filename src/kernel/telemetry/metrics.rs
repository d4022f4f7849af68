use std::collections::{HashMap, VecDeque};

use super::event::TelemetryEvent;
use crate::kernel::dialogue::Slot;
use crate::kernel::transition::ReaskCause;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub transitions: u64,
    pub reask_stats: ReaskStats,
    pub slot_stats: SlotStats,
    pub stale_discarded: u64,
    pub booked: u64,
    pub full_day_booked: u64,
    pub abandoned: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReaskStats {
    pub total: u64,
    pub not_recognised: u64,
    pub no_input: u64,
    pub listen_timeouts: u64,
    pub per_slot: HashMap<Slot, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct SlotStats {
    pub filled: u64,
    pub total_attempts: u64,
    pub avg_attempts: f64,
    pub max_attempts: u32,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::Transition { .. } => snap.transitions += 1,
            TelemetryEvent::SlotFilled { attempts, .. } => {
                snap.slot_stats.filled += 1;
                snap.slot_stats.total_attempts += u64::from(*attempts);
                snap.slot_stats.max_attempts = snap.slot_stats.max_attempts.max(*attempts);
            }
            TelemetryEvent::Reask { slot, cause, .. } => {
                snap.reask_stats.total += 1;
                *snap.reask_stats.per_slot.entry(*slot).or_default() += 1;
                match cause {
                    ReaskCause::NotRecognised => snap.reask_stats.not_recognised += 1,
                    ReaskCause::NoInput => snap.reask_stats.no_input += 1,
                    ReaskCause::ListenTimeout => snap.reask_stats.listen_timeouts += 1,
                }
            }
            TelemetryEvent::RetriesExhausted { .. } => snap.abandoned += 1,
            TelemetryEvent::StaleEventDiscarded { .. } => snap.stale_discarded += 1,
            TelemetryEvent::AppointmentBooked { full_day, .. } => {
                snap.booked += 1;
                if *full_day {
                    snap.full_day_booked += 1;
                }
            }
        }
    }

    if snap.slot_stats.filled > 0 {
        snap.slot_stats.avg_attempts =
            snap.slot_stats.total_attempts as f64 / snap.slot_stats.filled as f64;
    }

    snap
}
