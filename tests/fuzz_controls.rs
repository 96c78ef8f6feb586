//! Fuzzing tests for the sequencer control surface
//!
//! Random command and tick sequences against random step lists. The sequencer
//! must never panic and must keep its state consistent whatever the order of
//! calls.

use fitpace::sequencer::{
    Sequence, SequencerError, SequencerStatus, Step, StepCounter, StepSequencer,
};
use rand::Rng;

fn random_sequence(rng: &mut impl Rng) -> Sequence {
    let len = rng.gen_range(1..=8);
    let steps = (0..len)
        .map(|i| {
            let step = if rng.gen_bool(0.7) {
                Step::countdown(format!("Step {}", i), rng.gen_range(1..=6))
            } else {
                Step::count_up(format!("Step {}", i))
            };
            if rng.gen_bool(0.3) {
                step.with_repeat(rng.gen_range(1..=4))
            } else {
                step
            }
        })
        .collect();

    if rng.gen_bool(0.5) {
        Sequence::looping("fuzz", steps).unwrap()
    } else {
        Sequence::once("fuzz", steps).unwrap()
    }
}

fn check_invariants(seq: &StepSequencer) {
    let sequence = seq.sequence().unwrap();
    assert!(seq.cursor() < sequence.len());

    let step = seq.current_step().unwrap();
    assert!(seq.sub_iteration() >= 1);
    assert!(seq.sub_iteration() <= step.sub_iterations());

    match (step.mode.duration_seconds(), seq.counter()) {
        (Some(duration), StepCounter::Remaining(remaining)) => assert!(remaining <= duration),
        (None, StepCounter::Elapsed(_)) => {}
        (mode, counter) => panic!("Counter {:?} does not match step mode {:?}", counter, mode),
    }

    if sequence.is_looping() {
        assert_ne!(seq.status(), SequencerStatus::Completed);
    }
}

/// Random control sequences never break the state invariants
#[test]
fn fuzz_random_controls() {
    let mut rng = rand::thread_rng();

    for _ in 0..300 {
        let mut seq = StepSequencer::headless();
        seq.load(random_sequence(&mut rng)).unwrap();
        check_invariants(&seq);

        for _ in 0..200 {
            let before = seq.status();
            let elapsed = seq.session_elapsed();

            let result = match rng.gen_range(0..=9) {
                0 => seq.start(),
                1 => seq.pause(),
                2 => seq.resume(),
                3 => seq.advance(),
                4 => seq.retreat(),
                5 => seq.complete_sub_iteration(),
                6 => {
                    seq.stop();
                    Ok(())
                }
                _ => seq.tick(),
            };

            match result {
                Ok(()) => {}
                Err(SequencerError::InvalidState { status, .. }) => {
                    assert_eq!(status, before);
                    assert_ne!(before, SequencerStatus::Running);
                    assert_eq!(seq.status(), before);
                    assert_eq!(seq.session_elapsed(), elapsed);
                }
                Err(e) => panic!("Unexpected error: {}", e),
            }

            check_invariants(&seq);
        }
    }
}

/// Ticks alone drive a terminating countdown sequence to exactly one completion
#[test]
fn fuzz_countdown_only_completion() {
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let durations: Vec<u32> = (0..rng.gen_range(1..=6))
            .map(|_| rng.gen_range(1..=5))
            .collect();
        let steps = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Step::countdown(format!("Step {}", i), d))
            .collect();

        let mut seq = StepSequencer::headless();
        seq.load(Sequence::once("fuzz", steps).unwrap()).unwrap();
        seq.start().unwrap();

        // Random pauses in between do not change the tick count
        let total: u32 = durations.iter().sum();
        let mut ticked = 0;
        while ticked < total {
            if rng.gen_bool(0.1) {
                seq.pause().unwrap();
                assert!(seq.tick().is_err());
                seq.resume().unwrap();
            }
            assert_eq!(seq.status(), SequencerStatus::Running);
            seq.tick().unwrap();
            ticked += 1;
        }

        assert_eq!(seq.status(), SequencerStatus::Completed);
        assert_eq!(seq.session_elapsed(), total as u64);
        assert!(seq.tick().is_err());
    }
}
