use appointment_dm::config::DialogueConfig;
use appointment_dm::kernel::dialogue::Slot;
use appointment_dm::kernel::event::{Event, TimerKind};
use appointment_dm::kernel::machine::DialogueMachine;
use appointment_dm::kernel::reactor::Reactor;
use appointment_dm::kernel::telemetry::event::TelemetryEvent;
use appointment_dm::lexicon::Lexicon;
use appointment_dm::speech::ScriptedSpeech;
use tokio::sync::mpsc;

fn next(m: &mut DialogueMachine, event: impl FnOnce(appointment_dm::kernel::time::Turn) -> Event) {
    let turn = m.turn();
    m.step(event(turn));
}

/// Walk from a slot prompt to an open microphone.
fn open_mic(m: &mut DialogueMachine) {
    next(m, |turn| Event::SpeakComplete { turn });
    next(m, |turn| Event::TimerFired { turn, timer: TimerKind::ListenStartDelay });
}

fn booked_run(utterances: &[&str]) -> DialogueMachine {
    let mut m = DialogueMachine::new(DialogueConfig::default(), Lexicon::default());
    m.boot();
    m.step(Event::PrepareReady);
    m.step(Event::Start);
    next(&mut m, |turn| Event::SpeakComplete { turn });
    for utterance in utterances {
        open_mic(&mut m);
        next(&mut m, |turn| Event::recognised(turn, utterance));
        next(&mut m, |turn| Event::TimerFired { turn, timer: TimerKind::InterPrompt });
    }
    next(&mut m, |turn| Event::SpeakComplete { turn });
    m
}

#[test]
fn test_attempts_per_slot() {
    let mut m = DialogueMachine::new(DialogueConfig::default(), Lexicon::default());
    m.boot();
    m.step(Event::PrepareReady);
    m.step(Event::Start);
    next(&mut m, |turn| Event::SpeakComplete { turn });

    // Person: one miss, one silence, then a hit
    open_mic(&mut m);
    next(&mut m, |turn| Event::recognised(turn, "somebody"));
    open_mic(&mut m);
    next(&mut m, |turn| Event::TimerFired { turn, timer: TimerKind::ListenTimeout });
    open_mic(&mut m);
    next(&mut m, |turn| Event::recognised(turn, "jennifer"));

    // Date: first try
    next(&mut m, |turn| Event::TimerFired { turn, timer: TimerKind::InterPrompt });
    open_mic(&mut m);
    next(&mut m, |turn| Event::recognised(turn, "tuesday"));

    let snapshot = m.telemetry.snapshot();
    assert_eq!(snapshot.slot_stats.filled, 2);
    assert_eq!(snapshot.slot_stats.max_attempts, 3);
    assert_eq!(snapshot.slot_stats.avg_attempts, 2.0);
    assert_eq!(snapshot.reask_stats.total, 2);
    assert_eq!(snapshot.reask_stats.not_recognised, 1);
    assert_eq!(snapshot.reask_stats.listen_timeouts, 1);
    assert_eq!(snapshot.reask_stats.per_slot.get(&Slot::Person), Some(&2));
    assert_eq!(snapshot.reask_stats.per_slot.get(&Slot::Date), None);
}

#[test]
fn test_booking_counts() {
    let m = booked_run(&["vlad", "monday", "no", "10 am", "yes"]);
    let snapshot = m.telemetry.snapshot();
    assert_eq!(snapshot.booked, 1);
    assert_eq!(snapshot.full_day_booked, 0);
    assert_eq!(snapshot.abandoned, 0);
    assert!(snapshot.transitions > 10);

    let m = booked_run(&["emma", "friday", "yes", "sure"]);
    let snapshot = m.telemetry.snapshot();
    assert_eq!(snapshot.booked, 1);
    assert_eq!(snapshot.full_day_booked, 1);

    let booked_id = m.booked()[0].id;
    let recorded = m.telemetry.events().any(|e| {
        matches!(e, TelemetryEvent::AppointmentBooked { id, full_day: true } if *id == booked_id)
    });
    assert!(recorded, "Booking event should carry the appointment id");
}

#[test]
fn test_export_carries_no_user_content() {
    let m = booked_run(&["I'm meeting with Vladislav", "on monday", "no", "at ten", "yes please"]);
    assert_eq!(m.booked().len(), 1, "run should have booked");

    let json = m.telemetry.export_json().expect("telemetry serializes");
    assert!(!json.is_empty());
    for forbidden in ["Vladislav", "Maraev", "monday", "Monday", "please", "Do you want"] {
        assert!(!json.contains(forbidden), "telemetry leaked {:?}", forbidden);
    }
    assert!(json.contains("SlotFilled"));
    assert!(json.contains("AppointmentBooked"));
}

#[test]
fn test_recorder_clear() {
    let mut m = booked_run(&["john", "friday", "yes", "yes"]);
    assert!(m.telemetry.events().count() > 0);
    m.telemetry.clear();
    assert_eq!(m.telemetry.events().count(), 0);
    assert_eq!(m.telemetry.snapshot().booked, 0);
}

#[tokio::test]
async fn test_stale_events_counted_through_reactor() {
    let (tx, rx) = mpsc::channel(100);
    let machine = DialogueMachine::new(DialogueConfig::default(), Lexicon::default());
    let speech = DialogueConfig::default().speech;
    let port = ScriptedSpeech::new(tx.clone(), vec![]);
    let mut reactor = Reactor::new(rx, &tx, machine, port, speech);

    let effects = reactor.machine.boot();
    reactor.dispatch(effects);
    let boot_turn = reactor.machine.turn();
    reactor.handle(Event::PrepareReady);
    reactor.handle(Event::Start);

    // Answers for a turn the reactor has already left
    reactor.handle(Event::SpeakComplete { turn: boot_turn });
    reactor.handle(Event::NoInput { turn: boot_turn });

    let snapshot = reactor.machine.telemetry.snapshot();
    assert_eq!(snapshot.stale_discarded, 2);
    assert_eq!(reactor.machine.label(), "Greeting.Start");
}
