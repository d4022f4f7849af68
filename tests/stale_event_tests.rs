use appointment_dm::config::DialogueConfig;
use appointment_dm::kernel::dialogue::{DialogueState, Phase, Slot};
use appointment_dm::kernel::event::{Event, TimerKind};
use appointment_dm::kernel::machine::DialogueMachine;
use appointment_dm::kernel::time::Turn;
use appointment_dm::lexicon::Lexicon;

fn listening_for_person() -> DialogueMachine {
    let mut m = DialogueMachine::new(DialogueConfig::default(), Lexicon::default());
    m.boot();
    m.step(Event::PrepareReady);
    m.step(Event::Start);
    let turn = m.turn();
    m.step(Event::SpeakComplete { turn }); // greeting
    let turn = m.turn();
    m.step(Event::SpeakComplete { turn }); // prompt
    let turn = m.turn();
    m.step(Event::TimerFired { turn, timer: TimerKind::ListenStartDelay });
    assert_eq!(m.state(), DialogueState::Slot { slot: Slot::Person, phase: Phase::Ask });
    m
}

#[test]
fn test_late_recognition_after_timeout_is_discarded() {
    let mut m = listening_for_person();
    let listen_turn = m.turn();

    // Timeout wins the race and re-asks
    m.step(Event::TimerFired { turn: listen_turn, timer: TimerKind::ListenTimeout });
    assert_eq!(m.state(), DialogueState::ask(Slot::Person));

    // The answer to the abandoned listen shows up late
    let effects = m.step(Event::recognised(listen_turn, "john"));

    assert!(effects.is_empty(), "Stale recognition should not produce effects");
    assert!(m.context().meeting_person.is_empty(), "Stale recognition should not mutate context");
    assert_eq!(m.state(), DialogueState::ask(Slot::Person));
    assert_eq!(m.telemetry.snapshot().stale_discarded, 1);
}

#[test]
fn test_late_answer_cannot_overwrite_next_slot() {
    let mut m = listening_for_person();
    let person_turn = m.turn();
    m.step(Event::recognised(person_turn, "emma"));

    // Advance into AskDate listening
    let turn = m.turn();
    m.step(Event::TimerFired { turn, timer: TimerKind::InterPrompt });
    let turn = m.turn();
    m.step(Event::SpeakComplete { turn });
    let turn = m.turn();
    m.step(Event::TimerFired { turn, timer: TimerKind::ListenStartDelay });

    // A duplicate of the person answer arrives while the date is being asked
    m.step(Event::recognised(person_turn, "john"));
    m.step(Event::NoInput { turn: person_turn });

    assert_eq!(m.context().meeting_person, "Emma Watson");
    assert_eq!(m.state(), DialogueState::Slot { slot: Slot::Date, phase: Phase::Ask });
    assert_eq!(m.telemetry.snapshot().stale_discarded, 2);
}

#[test]
fn test_speak_completion_after_speak_timeout_is_discarded() {
    let mut m = listening_for_person();
    m.step(Event::NoInput { turn: m.turn() });
    let prompt_turn = m.turn();

    m.step(Event::TimerFired { turn: prompt_turn, timer: TimerKind::SpeakTimeout });
    let after_timeout = m.turn();
    assert_eq!(
        m.state(),
        DialogueState::Slot { slot: Slot::Person, phase: Phase::WaitBeforeListen }
    );

    // Completion of the same speech arrives afterwards
    let effects = m.step(Event::SpeakComplete { turn: prompt_turn });
    assert!(effects.is_empty());
    assert_eq!(m.turn(), after_timeout);
}

#[test]
fn test_timer_from_previous_state_is_discarded() {
    let mut m = listening_for_person();
    let ask_turn = m.turn();
    m.step(Event::recognised(ask_turn, "vlad"));

    // The listen timeout armed in Ask fires anyway
    let effects = m.step(Event::TimerFired { turn: ask_turn, timer: TimerKind::ListenTimeout });

    assert!(effects.is_empty());
    assert_eq!(m.context().meeting_person, "Vladislav Maraev");
    assert!(m.context().last_recognition_result.is_some());
}

#[test]
fn test_turns_are_monotonic() {
    let mut m = listening_for_person();
    let before = m.turn();
    m.step(Event::NoInput { turn: before });
    assert!(m.turn() > before);

    // Events from the future are just as unknown as events from the past
    let future = Turn { generation: m.turn().generation + 5 };
    assert!(m.step(Event::SpeakComplete { turn: future }).is_empty());
}
