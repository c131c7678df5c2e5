use proptest::prelude::*;
use sortscope::algorithms;
use sortscope::domain::Outcome;
use sortscope::engine::{Run, RunConfig};
use sortscope_common::{is_sorted, Algorithm, Element, NoopHook, Tracked};
use std::time::Duration;

fn sorted_by(algorithm: &Algorithm, values: &[i32]) -> Vec<i32> {
    let mut items: Vec<Element> = values.iter().copied().map(Element::new).collect();
    let hook = NoopHook;
    let mut tracked = Tracked::new(&mut items, &hook);
    assert!((algorithm.run)(&mut tracked).is_ok(), "{} was cancelled", algorithm.name);
    items.iter().map(Element::value).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_algorithm_sorts_into_a_permutation(
        values in prop::collection::vec(-50i32..50, 0..80),
    ) {
        let mut expected = values.clone();
        expected.sort_unstable();
        for algorithm in algorithms::catalogue() {
            prop_assert_eq!(sorted_by(algorithm, &values), expected.clone(), "{}", algorithm.name);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn engine_run_completes_sorted(
        values in prop::collection::vec(0i32..1000, 0..40),
        index in 0usize..10,
    ) {
        let algorithm = &algorithms::catalogue()[index % algorithms::catalogue().len()];
        let mut sequence: Vec<Element> = values.iter().copied().map(Element::new).collect();
        sortscope::generate::attach_handles(&mut sequence);

        let mut run = Run::new(sequence, RunConfig::default());
        run.start(algorithm).unwrap();
        prop_assert!(run.wait_finished(Some(Duration::from_secs(30))));
        prop_assert_eq!(run.outcome(), Some(Outcome::Completed));
        prop_assert!(is_sorted(run.sequence().unwrap()));
        prop_assert_eq!(run.element_count(), values.len());
    }
}
