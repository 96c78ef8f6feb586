//! Step sequencer behavior tests
//!
//! Drives the sequencer with synthetic ticks and checks the observable
//! transitions a view would see.

use fitpace::cue::{Cue, CueDispatcher, CueError, CuePlayer, CuePolicy, CueSettings};
use fitpace::messaging::{NullView, SequencerEvent, View};
use fitpace::sequencer::{
    Sequence, SequencerError, SequencerStatus, Step, StepCounter, StepSequencer,
};
use std::sync::{Arc, Mutex};

/// View recording every event for later inspection
#[derive(Clone, Default)]
struct RecordingView(Arc<Mutex<Vec<SequencerEvent>>>);

impl RecordingView {
    fn take(&self) -> Vec<SequencerEvent> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl View for RecordingView {
    fn on_event(&mut self, event: &SequencerEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn recorded() -> (StepSequencer, RecordingView) {
    let view = RecordingView::default();
    let sequencer = StepSequencer::new(Box::new(view.clone()), CueDispatcher::silent());
    (sequencer, view)
}

fn step_changes(events: &[SequencerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            SequencerEvent::StepChanged(display) => Some(display.step.label.clone()),
            _ => None,
        })
        .collect()
}

fn breathing_loop() -> Sequence {
    Sequence::looping(
        "breathing",
        vec![
            Step::countdown("Inhale", 4),
            Step::countdown("Hold", 4),
            Step::countdown("Exhale", 6),
        ],
    )
    .unwrap()
}

/// Load leaves every sequence at cursor 0, Idle
#[test]
fn test_load_resets_cursor_and_status() {
    let (mut seq, _view) = recorded();
    seq.load(breathing_loop()).unwrap();
    assert_eq!(seq.cursor(), 0);
    assert_eq!(seq.status(), SequencerStatus::Idle);

    // Reloading mid-session starts over
    seq.start().unwrap();
    seq.advance().unwrap();
    seq.tick().unwrap();
    seq.load(breathing_loop()).unwrap();
    assert_eq!(seq.cursor(), 0);
    assert_eq!(seq.status(), SequencerStatus::Idle);
    assert_eq!(seq.session_elapsed(), 0);
}

/// Four ticks on Inhale move to Hold exactly once, re-armed at 4
#[test]
fn test_breathing_scenario() {
    let (mut seq, view) = recorded();
    seq.load(breathing_loop()).unwrap();
    seq.start().unwrap();
    view.take();

    for _ in 0..4 {
        seq.tick().unwrap();
    }

    let events = view.take();
    assert_eq!(step_changes(&events), vec!["Hold"]);
    assert_eq!(seq.cursor(), 1);
    assert_eq!(seq.counter(), StepCounter::Remaining(4));

    let ticks = events
        .iter()
        .filter(|e| matches!(e, SequencerEvent::Tick { .. }))
        .count();
    assert_eq!(ticks, 4);
}

/// Count-up sets progress only through manual completion
#[test]
fn test_squats_scenario() {
    let (mut seq, view) = recorded();
    seq.load(Sequence::once("w", vec![Step::count_up("Squats").with_repeat(3)]).unwrap())
        .unwrap();
    seq.start().unwrap();
    assert_eq!(seq.sub_iteration(), 1);

    // Ticks count up and never advance
    for _ in 0..30 {
        seq.tick().unwrap();
    }
    assert_eq!(seq.counter(), StepCounter::Elapsed(30));
    assert_eq!(seq.sub_iteration(), 1);

    seq.complete_sub_iteration().unwrap();
    assert_eq!((seq.cursor(), seq.sub_iteration()), (0, 2));
    seq.complete_sub_iteration().unwrap();
    assert_eq!((seq.cursor(), seq.sub_iteration()), (0, 3));
    assert_eq!(seq.status(), SequencerStatus::Running);

    seq.complete_sub_iteration().unwrap();
    assert_eq!(seq.status(), SequencerStatus::Completed);

    let completions = view
        .take()
        .into_iter()
        .filter(|e| matches!(e, SequencerEvent::Completed { .. }))
        .count();
    assert_eq!(completions, 1);
}

/// Countdown of D seconds moves the cursor exactly once after D ticks
#[test]
fn test_countdown_advances_after_duration() {
    for duration in [1, 2, 5, 13] {
        let (mut seq, _view) = recorded();
        let steps = vec![Step::countdown("A", duration), Step::countdown("B", 3)];
        seq.load(Sequence::once("t", steps).unwrap()).unwrap();
        seq.start().unwrap();

        for _ in 0..duration - 1 {
            seq.tick().unwrap();
            assert_eq!(seq.cursor(), 0);
        }
        seq.tick().unwrap();
        assert_eq!(seq.cursor(), 1);
        assert_eq!(seq.status(), SequencerStatus::Running);
    }

    // Single non-looping step completes instead
    let (mut seq, _view) = recorded();
    seq.load(Sequence::once("t", vec![Step::countdown("Only", 3)]).unwrap())
        .unwrap();
    seq.start().unwrap();
    for _ in 0..3 {
        seq.tick().unwrap();
    }
    assert_eq!(seq.status(), SequencerStatus::Completed);
    assert_eq!(seq.cursor(), 0);
}

/// Pause after 3 ticks of 10, resume, advance fires on the 7th tick
#[test]
fn test_pause_resume_preserves_counter() {
    let (mut seq, _view) = recorded();
    let steps = vec![Step::countdown("Run", 10), Step::countdown("Walk", 10)];
    seq.load(Sequence::once("t", steps).unwrap()).unwrap();
    seq.start().unwrap();

    for _ in 0..3 {
        seq.tick().unwrap();
    }
    seq.pause().unwrap();
    seq.resume().unwrap();

    for tick in 1..=7 {
        seq.tick().unwrap();
        let expected = if tick < 7 { 0 } else { 1 };
        assert_eq!(seq.cursor(), expected, "after tick {}", tick);
    }
}

/// A looping sequence cycles its cursor and never completes
#[test]
fn test_looping_cycles_forever() {
    let (mut seq, view) = recorded();
    seq.load(breathing_loop()).unwrap();
    seq.start().unwrap();

    let mut cursors = Vec::new();
    for _ in 0..9 {
        seq.advance().unwrap();
        cursors.push(seq.cursor());
    }
    assert_eq!(cursors, vec![1, 2, 0, 1, 2, 0, 1, 2, 0]);

    for _ in 0..1000 {
        seq.tick().unwrap();
    }
    assert_eq!(seq.status(), SequencerStatus::Running);
    assert!(
        !view
            .take()
            .iter()
            .any(|e| matches!(e, SequencerEvent::Completed { .. }))
    );
}

/// After completion, tick and advance are rejected
#[test]
fn test_completed_rejects_progress() {
    let (mut seq, view) = recorded();
    let steps = vec![Step::countdown("A", 1), Step::countdown("B", 1), Step::countdown("C", 1)];
    seq.load(Sequence::once("t", steps).unwrap()).unwrap();
    seq.start().unwrap();
    for _ in 0..3 {
        seq.tick().unwrap();
    }
    assert_eq!(seq.status(), SequencerStatus::Completed);
    let elapsed = seq.session_elapsed();

    assert!(matches!(
        seq.tick(),
        Err(SequencerError::InvalidState { status: SequencerStatus::Completed, .. })
    ));
    assert!(matches!(seq.advance(), Err(SequencerError::InvalidState { .. })));
    assert!(matches!(seq.retreat(), Err(SequencerError::InvalidState { .. })));
    assert!(matches!(
        seq.complete_sub_iteration(),
        Err(SequencerError::InvalidState { .. })
    ));
    assert_eq!(seq.session_elapsed(), elapsed);

    let completions = view
        .take()
        .into_iter()
        .filter(|e| matches!(e, SequencerEvent::Completed { .. }))
        .count();
    assert_eq!(completions, 1);
}

/// Retreat at the first step keeps the cursor but re-arms the step
#[test]
fn test_retreat_at_first_step() {
    let (mut seq, view) = recorded();
    seq.load(Sequence::looping("t", vec![Step::countdown("Inhale", 5).with_repeat(2)]).unwrap())
        .unwrap();
    seq.start().unwrap();
    for _ in 0..7 {
        seq.tick().unwrap();
    }
    assert_eq!(seq.sub_iteration(), 2);
    assert_eq!(seq.counter(), StepCounter::Remaining(3));
    view.take();

    seq.retreat().unwrap();
    assert_eq!(seq.cursor(), 0);
    assert_eq!(seq.sub_iteration(), 1);
    assert_eq!(seq.counter(), StepCounter::Remaining(5));
    assert_eq!(step_changes(&view.take()), vec!["Inhale"]);
}

/// Operations before load
#[test]
fn test_control_before_load() {
    let (mut seq, view) = recorded();
    assert_eq!(seq.start(), Err(SequencerError::NotLoaded));
    assert_eq!(seq.retreat(), Err(SequencerError::NotLoaded));
    assert_eq!(seq.complete_sub_iteration(), Err(SequencerError::NotLoaded));

    // Stop is always legal
    seq.stop();
    assert_eq!(view.take(), vec![SequencerEvent::Reset]);
}

/// Step-changed events carry position and upcoming preview
#[test]
fn test_step_changed_display_values() {
    let (mut seq, view) = recorded();
    seq.load(breathing_loop()).unwrap();
    seq.start().unwrap();
    seq.advance().unwrap();
    seq.advance().unwrap();

    let displays: Vec<_> = view
        .take()
        .into_iter()
        .filter_map(|e| match e {
            SequencerEvent::StepChanged(d) => Some(d),
            _ => None,
        })
        .collect();

    let last = displays.last().unwrap();
    assert_eq!(last.displayed_step, 3);
    assert_eq!(last.total_steps, 3);
    assert!(last.upcoming.is_empty());
    assert_eq!(last.counter, StepCounter::Remaining(6));
    assert_eq!(displays[0].upcoming, vec!["Hold", "Exhale"]);
}

/// Cue failures are counted and never interrupt the sequence
#[test]
fn test_failing_cues_do_not_stop_sequence() {
    struct FailingPlayer;

    impl CuePlayer for FailingPlayer {
        fn play(&mut self, cue: &Cue, _volume: f32) -> Result<(), CueError> {
            Err(CueError::Backend(format!("no audio device for {}", cue)))
        }

        fn silence(&mut self) {}
    }

    let mut seq = StepSequencer::new(
        Box::new(NullView),
        CueDispatcher::new(Box::new(FailingPlayer), CueSettings::default()),
    );
    let steps = vec![
        Step::countdown("Inhale", 1).with_cue("inhale-sound"),
        Step::countdown("Exhale", 1).with_cue("exhale-sound"),
    ];
    seq.load(Sequence::once("t", steps).unwrap()).unwrap();
    seq.start().unwrap();
    seq.tick().unwrap();
    seq.tick().unwrap();

    assert_eq!(seq.status(), SequencerStatus::Completed);
    assert_eq!(seq.cues_mut().failed_count(), 2);
    assert_eq!(seq.cues_mut().played_count(), 0);
}

/// Disabled cues are skipped entirely
#[test]
fn test_disabled_cues_are_skipped() {
    let (mut seq, _view) = recorded();
    seq.cues_mut().set_enabled(false);
    let steps = vec![Step::countdown("Inhale", 1).with_cue("inhale-sound")];
    seq.load(Sequence::looping("t", steps).unwrap()).unwrap();
    seq.start().unwrap();
    seq.tick().unwrap();

    assert_eq!(seq.cues_mut().played_count(), 0);
    assert_eq!(seq.cues_mut().policy(), CuePolicy::OncePerStep);
}

/// Stop keeps the frozen clock readable, start begins a fresh run at step 0
#[test]
fn test_stop_then_start_restarts_session() {
    #[derive(Clone, Default)]
    struct CueLog(Arc<Mutex<Vec<String>>>);

    impl CuePlayer for CueLog {
        fn play(&mut self, cue: &Cue, _volume: f32) -> Result<(), CueError> {
            let entry = match cue {
                Cue::Sound(id) => id.clone(),
                Cue::Speak(text) => format!("speak:{}", text),
            };
            self.0.lock().unwrap().push(entry);
            Ok(())
        }

        fn silence(&mut self) {
            self.0.lock().unwrap().push("<silence>".to_string());
        }
    }

    let cues = CueLog::default();
    let view = RecordingView::default();
    let mut seq = StepSequencer::new(
        Box::new(view.clone()),
        CueDispatcher::new(Box::new(cues.clone()), CueSettings::default()),
    );
    let steps = vec![
        Step::countdown("A", 3).with_cue("a"),
        Step::countdown("B", 2).with_cue("b"),
    ];
    seq.load(Sequence::once("t", steps).unwrap()).unwrap();
    seq.start().unwrap();
    seq.tick().unwrap();
    seq.advance().unwrap();
    seq.tick().unwrap();
    view.take();

    seq.stop();
    assert_eq!(seq.status(), SequencerStatus::Idle);
    assert_eq!(seq.cursor(), 0);
    assert_eq!(seq.counter(), StepCounter::Remaining(3));
    assert_eq!(seq.session_elapsed(), 2);
    assert_eq!(view.take(), vec![SequencerEvent::Reset]);

    seq.start().unwrap();
    assert_eq!(seq.status(), SequencerStatus::Running);
    assert_eq!(seq.cursor(), 0);
    assert_eq!(seq.counter(), StepCounter::Remaining(3));
    assert_eq!(seq.session_elapsed(), 0);
    assert_eq!(step_changes(&view.take()), vec!["A"]);
    assert_eq!(*cues.0.lock().unwrap(), vec!["a", "b", "<silence>", "a"]);

    // The new run counts from zero
    seq.tick().unwrap();
    assert_eq!(seq.session_elapsed(), 1);
    assert_eq!(seq.counter(), StepCounter::Remaining(2));
}
