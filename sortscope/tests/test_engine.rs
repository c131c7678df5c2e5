use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sortscope::algorithms;
use sortscope::domain::{Counters, Outcome, RunError, RunState};
use sortscope::engine::{Run, RunConfig, RunEvent};
use sortscope::generate::{attach_handles, generate_with, ArrayOrder};
use sortscope_common::{is_sorted, Element, Handle, Step, Tracked};
use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

const TIMEOUT: Option<Duration> = Some(Duration::from_secs(30));

fn config(delay_us: u64) -> RunConfig {
    RunConfig { delay: Duration::from_micros(delay_us), fps: 50 }
}

fn seeded(len: usize, order: ArrayOrder) -> Vec<Element> {
    generate_with(&mut StdRng::seed_from_u64(0x5eed), len, order)
}

fn values(items: &[Element]) -> Vec<i32> {
    items.iter().map(Element::value).collect()
}

fn events(rx: &Receiver<RunEvent>) -> Vec<RunEvent> {
    rx.try_iter().collect()
}

fn finished_count(events: &[RunEvent]) -> usize {
    events.iter().filter(|e| matches!(e, RunEvent::StateChanged(RunState::Finished))).count()
}

/// Final order and counters of an uncontested run.
fn baseline(sequence: Vec<Element>, name: &str) -> (Vec<i32>, Counters) {
    let mut run = Run::new(sequence, config(0));
    run.start(algorithms::find(name).unwrap()).unwrap();
    assert!(run.wait_finished(TIMEOUT));
    (values(run.sequence().unwrap()), run.counters())
}

#[test]
fn test_insertion_sort_three_elements() {
    let mut sequence: Vec<Element> = [3, 1, 2].into_iter().map(Element::new).collect();
    attach_handles(&mut sequence);

    let mut run = Run::new(sequence, config(0));
    let rx = run.subscribe();
    run.start(algorithms::find("InsertionSort").unwrap()).unwrap();
    assert!(run.wait_finished(TIMEOUT));

    assert_eq!(values(run.sequence().unwrap()), vec![1, 2, 3]);
    let counters = run.counters();
    assert_eq!(counters.comparisons, 3);
    // Three compares (two accesses each) and two swaps (two writes each)
    assert_eq!(counters.accesses, 10);
    assert!(counters.accesses >= counters.comparisons * 2);

    let mut touched = Vec::new();
    let mut assigned = HashMap::new();
    for event in events(&rx) {
        if let RunEvent::Snapshot(snapshot) = event {
            touched.extend(snapshot.touched().iter().copied());
            assigned.extend(snapshot.assigned().iter().map(|(h, v)| (*h, *v)));
        }
    }
    // Swaps at positions (0,1) then (1,2)
    assert_eq!(assigned, HashMap::from([(Handle(0), 1), (Handle(1), 2), (Handle(2), 3)]));
    assert!(touched.iter().all(|h| h.0 <= 2));
}

#[test]
fn test_second_start_fails_and_first_run_continues() {
    let mut run = Run::new(seeded(80, ArrayOrder::Random), config(20));
    let algorithm = algorithms::find("SelectionSort").unwrap();
    run.start(algorithm).unwrap();

    let err = run.start(algorithm).unwrap_err();
    assert!(matches!(err, RunError::AlreadyStarted(RunState::Running)));
    assert_eq!(run.state(), RunState::Running);

    assert!(run.wait_finished(TIMEOUT));
    assert_eq!(run.outcome(), Some(Outcome::Completed));
    assert!(is_sorted(run.sequence().unwrap()));
}

#[test]
fn test_pause_resume_matches_uncontested_run() {
    let (expected_values, expected_counters) =
        baseline(seeded(150, ArrayOrder::Random), "ShellSort");

    let mut run = Run::new(seeded(150, ArrayOrder::Random), config(10));
    run.start(algorithms::find("ShellSort").unwrap()).unwrap();

    for _ in 0..5 {
        thread::sleep(Duration::from_millis(5));
        if run.pause().is_err() {
            break;
        }
        assert_eq!(run.state(), RunState::Paused);

        // At most the operation in flight lands after pause() returns
        thread::sleep(Duration::from_millis(20));
        let frozen = run.counters();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(run.counters(), frozen);

        run.resume().unwrap();
    }

    assert!(run.wait_finished(TIMEOUT));
    assert_eq!(values(run.sequence().unwrap()), expected_values);
    assert_eq!(run.counters(), expected_counters);
}

fn is_delivery(event: &RunEvent) -> bool {
    matches!(event, RunEvent::Snapshot(_) | RunEvent::Counters(_))
}

fn poll_for(run: &mut Run, span: Duration) {
    let until = Instant::now() + span;
    while Instant::now() < until {
        run.poll();
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_no_snapshots_while_paused() {
    // 50 fps: one emitter interval every 20ms
    let mut run = Run::new(seeded(300, ArrayOrder::Descending), config(100));
    let rx = run.subscribe();
    run.start(algorithms::find("BubbleSort").unwrap()).unwrap();

    poll_for(&mut run, Duration::from_millis(60));
    assert!(events(&rx).iter().any(is_delivery));

    run.pause().unwrap();
    assert!(matches!(events(&rx).last(), Some(RunEvent::StateChanged(RunState::Paused))));

    poll_for(&mut run, Duration::from_millis(200));
    let while_paused = events(&rx);
    assert!(!while_paused.iter().any(is_delivery), "{while_paused:?}");
    assert_eq!(run.state(), RunState::Paused);

    run.resume().unwrap();
    poll_for(&mut run, Duration::from_millis(60));
    let resumed = events(&rx);
    assert!(matches!(resumed.first(), Some(RunEvent::StateChanged(RunState::Running))));
    assert!(resumed.iter().any(|e| matches!(e, RunEvent::Snapshot(_))));
    assert!(resumed.iter().any(|e| matches!(e, RunEvent::Counters(_))));

    run.stop().unwrap();
}

#[test]
fn test_stop_mid_run_drains_twice() {
    let mut run = Run::new(seeded(300, ArrayOrder::Descending), config(50));
    let rx = run.subscribe();
    run.start(algorithms::find("BubbleSort").unwrap()).unwrap();

    // No poll() here, so every change so far is still pending
    thread::sleep(Duration::from_millis(50));
    let stopping = Instant::now();
    run.stop().unwrap();
    assert!(stopping.elapsed() < Duration::from_secs(2));

    assert_eq!(run.state(), RunState::Finished);
    assert_eq!(run.outcome(), Some(Outcome::Cancelled));

    let snapshots: Vec<bool> = events(&rx)
        .iter()
        .filter_map(|e| match e {
            RunEvent::Snapshot(s) => Some(s.is_empty()),
            _ => None,
        })
        .collect();
    assert_eq!(snapshots, vec![false, true]);

    // Sequence comes back intact: still a permutation of 0..300
    let mut returned = values(run.sequence().unwrap());
    returned.sort_unstable();
    assert_eq!(returned, (0..300).collect::<Vec<_>>());
}

#[test]
fn test_stop_while_paused() {
    let mut run = Run::new(seeded(200, ArrayOrder::Descending), config(20));
    run.start(algorithms::find("CocktailSort").unwrap()).unwrap();
    thread::sleep(Duration::from_millis(10));
    run.pause().unwrap();
    thread::sleep(Duration::from_millis(20));

    let stopping = Instant::now();
    run.stop().unwrap();
    assert!(stopping.elapsed() < Duration::from_secs(2));
    assert_eq!(run.state(), RunState::Finished);
    assert_eq!(run.outcome(), Some(Outcome::Cancelled));
}

#[test]
fn test_counters_never_decrease() {
    let mut run = Run::new(seeded(120, ArrayOrder::Random), config(5));
    let rx = run.subscribe();
    run.start(algorithms::find("MergeSort").unwrap()).unwrap();
    assert!(run.wait_finished(TIMEOUT));

    let counters: Vec<Counters> = events(&rx)
        .into_iter()
        .filter_map(|e| match e {
            RunEvent::Counters(c) => Some(c),
            _ => None,
        })
        .collect();
    assert!(counters.len() >= 2);
    for pair in counters.windows(2) {
        assert!(pair[1].accesses >= pair[0].accesses);
        assert!(pair[1].comparisons >= pair[0].comparisons);
    }
    assert_eq!(counters.last().copied(), Some(run.counters()));
}

#[test]
fn test_set_delay_changes_pace_not_result() {
    let (expected_values, expected_counters) =
        baseline(seeded(60, ArrayOrder::Random), "InsertionSort");

    let mut run = Run::new(seeded(60, ArrayOrder::Random), config(5000));
    assert_eq!(run.delay(), Duration::from_micros(5000));
    run.start(algorithms::find("InsertionSort").unwrap()).unwrap();

    // At 5ms per operation the run cannot get far in 50ms
    thread::sleep(Duration::from_millis(50));
    let slowed = run.counters();
    assert!(slowed.accesses < expected_counters.accesses);

    // Dropping the delay wakes the sleeping worker at once
    run.set_delay(Duration::ZERO);
    assert!(run.wait_finished(Some(Duration::from_secs(5))));
    assert_eq!(values(run.sequence().unwrap()), expected_values);
    assert_eq!(run.counters(), expected_counters);
}

#[test]
fn test_finished_is_published_exactly_once() {
    let mut run = Run::new(seeded(50, ArrayOrder::MostlySorted), config(0));
    let rx = run.subscribe();
    run.start(algorithms::find("QuickSort").unwrap()).unwrap();
    assert!(run.wait_finished(TIMEOUT));
    for _ in 0..5 {
        run.poll();
    }
    assert!(run.stop().is_err());

    let all = events(&rx);
    assert_eq!(finished_count(&all), 1);
    assert!(matches!(all.first(), Some(RunEvent::StateChanged(RunState::Running))));
    assert!(matches!(all.last(), Some(RunEvent::StateChanged(RunState::Finished))));
}

#[test]
fn test_panicking_algorithm_reaches_finished() {
    fn out_of_bounds(seq: &mut Tracked<'_>) -> Step<()> {
        for i in 0..=seq.len() {
            seq.read(i)?;
        }
        Ok(())
    }

    let mut run = Run::new(seeded(8, ArrayOrder::Ascending), config(0));
    let rx = run.subscribe();
    run.start_with("out-of-bounds", out_of_bounds).unwrap();
    assert!(run.wait_finished(TIMEOUT));

    assert_eq!(run.outcome(), Some(Outcome::Panicked));
    assert!(run.sequence().is_none());
    assert_eq!(finished_count(&events(&rx)), 1);
    // Reads before the panic were still counted
    assert_eq!(run.counters().accesses, 8);
}

#[test]
fn test_dropped_subscriber_does_not_stall_run() {
    let mut run = Run::new(seeded(40, ArrayOrder::Random), config(0));
    drop(run.subscribe());
    let kept = run.subscribe();
    run.start(algorithms::find("HeapSort").unwrap()).unwrap();
    assert!(run.wait_finished(TIMEOUT));
    assert_eq!(finished_count(&events(&kept)), 1);
}

#[test]
fn test_never_started_run_times_out_waiting() {
    let mut run = Run::new(seeded(4, ArrayOrder::Random), config(0));
    assert!(!run.wait_finished(Some(Duration::from_millis(20))));
    assert_eq!(run.state(), RunState::NotStarted);
}
