//! End-to-end deduction flows over small populations, plus property tests
//! for the invariants that hold under arbitrary observation sequences.

use proptest::prelude::*;

use matchup_solver::{
    BeamAnalysis, Constraint, Couple, Registry, Scenario, ScenarioStore, Snapshot, SolverError,
};

fn couples(registry: &Registry, pairs: &[(&str, &str)]) -> Vec<Couple> {
    pairs
        .iter()
        .map(|&(a, b)| registry.couple(a, b).unwrap())
        .collect()
}

#[test]
fn six_person_season_narrows_to_the_truth() {
    let registry = Registry::new(["Ava", "Ben", "Cleo", "Dan", "Eve", "Finn"]).unwrap();
    let mut store = ScenarioStore::new(registry.clone()).unwrap();
    assert_eq!(store.size().unwrap(), 15);

    // Hidden truth: Ava-Ben, Cleo-Dan, Eve-Finn.
    let truth = couples(&registry, &[("Ava", "Ben"), ("Cleo", "Dan"), ("Eve", "Finn")]);

    // Week 1: a wrong guess scores one beam.
    let guess = couples(&registry, &[("Ava", "Ben"), ("Cleo", "Eve"), ("Dan", "Finn")]);
    store.apply_matchup_ceremony(guess, 1).unwrap();
    assert!(store.size().unwrap() < 15);

    // Week 2: the truth booth confirms Ava-Ben.
    store
        .apply_truth_booth(registry.couple("Ava", "Ben").unwrap(), true)
        .unwrap();
    let best = store.best_matches("Ava").unwrap();
    assert_eq!(best.partners, vec!["Ben"]);
    assert!(best.is_confirmed());

    // Week 3: the full truth scores three beams and pins the scenario.
    store.apply_matchup_ceremony(truth.clone(), 3).unwrap();
    assert_eq!(store.size().unwrap(), 1);
    let expected = Scenario::from_couples(truth, registry.len());
    assert!(store.scenarios().contains(&expected));
    for name in ["Ava", "Ben", "Cleo", "Dan", "Eve", "Finn"] {
        assert!(store.best_matches(name).unwrap().is_confirmed());
    }
}

#[test]
fn contradictory_observations_poison_derived_queries_only() {
    let registry = Registry::new(["A", "B", "C", "D"]).unwrap();
    let mut store = ScenarioStore::new(registry.clone()).unwrap();
    let ab = registry.couple("A", "B").unwrap();

    store.apply_truth_booth(ab, true).unwrap();
    // Applying the contradiction itself must succeed.
    store.apply_truth_booth(ab, false).unwrap();
    assert!(store.is_exhausted());
    assert!(matches!(store.size(), Err(SolverError::EmptyScenarioSet)));
    assert!(matches!(
        BeamAnalysis::analyze(store.scenarios()),
        Err(SolverError::EmptyScenarioSet)
    ));
}

#[test]
fn beam_analysis_feeds_off_the_live_store() {
    let registry = Registry::new(["A", "B", "C", "D", "E", "F"]).unwrap();
    let mut store = ScenarioStore::new(registry.clone()).unwrap();
    store
        .apply_truth_booth(registry.couple("A", "B").unwrap(), true)
        .unwrap();

    // With A-B fixed, the remaining universe is the three matchings of the
    // other four contestants.
    assert_eq!(store.size().unwrap(), 3);
    let analysis = BeamAnalysis::analyze(store.scenarios()).unwrap();
    for (_, profile) in analysis.profiles() {
        let mut beams = profile.beams.clone();
        beams.sort_unstable();
        // Shared A-B couple everywhere, full self-overlap once.
        assert_eq!(beams, vec![1, 1, 3]);
        assert_eq!(profile.summary.mode, Some(1));
    }
    let summary = analysis.extremal_summary();
    assert_eq!(summary.max_min_beams.value, 1);
    assert_eq!(summary.max_min_beams.scenarios.len(), 3);
}

#[test]
fn snapshot_round_trip_mid_season() {
    let registry = Registry::new(["A", "B", "C", "D", "E", "F"]).unwrap();
    let mut store = ScenarioStore::new(registry.clone()).unwrap();
    store
        .apply_matchup_ceremony(
            couples(&registry, &[("A", "B"), ("C", "D"), ("E", "F")]),
            1,
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mid-season.json");
    Snapshot::capture(&store).save_to(&path).unwrap();
    let restored = Snapshot::load_from(&path).unwrap().restore().unwrap();

    assert_eq!(restored.size().unwrap(), store.size().unwrap());
    assert_eq!(
        restored.best_matches("A").unwrap(),
        store.best_matches("A").unwrap()
    );

    // Both copies keep deducing identically.
    let mut store_b = restored;
    let ef = registry.couple("E", "F").unwrap();
    store.apply_truth_booth(ef, true).unwrap();
    store_b.apply_truth_booth(ef, true).unwrap();
    assert_eq!(store.scenarios(), store_b.scenarios());
}

fn registry_of(n: usize) -> Registry {
    Registry::new((0..n).map(|i| format!("p{i}"))).unwrap()
}

proptest! {
    // A ceremony scored against the actual hidden scenario never discards
    // that scenario, only narrows around it.
    #[test]
    fn truthful_ceremonies_keep_the_truth(truth_at in 0usize..15, guess_at in 0usize..15) {
        let registry = registry_of(6);
        let mut store = ScenarioStore::new(registry.clone()).unwrap();
        let universe: Vec<Scenario> = store.scenarios().iter().copied().collect();
        let initial = store.scenarios().clone();
        let truth = universe[truth_at];
        let guess = universe[guess_at];

        let beams = truth.overlap(&guess);
        store.apply_matchup_ceremony(guess.couples(registry.len()), beams).unwrap();

        prop_assert!(store.scenarios().contains(&truth));
        prop_assert!(store.size().unwrap() <= initial.len());
        prop_assert!(store.scenarios().is_subset_of(&initial));
    }

    // Per-contestant probability mass always sums to one on a non-empty
    // store.
    #[test]
    fn probability_mass_is_conserved(truth_at in 0usize..15, guess_at in 0usize..15) {
        let registry = registry_of(6);
        let mut store = ScenarioStore::new(registry.clone()).unwrap();
        let universe: Vec<Scenario> = store.scenarios().iter().copied().collect();
        let (truth, guess) = (universe[truth_at], universe[guess_at]);
        store
            .apply_matchup_ceremony(guess.couples(registry.len()), truth.overlap(&guess))
            .unwrap();

        let matrix = store.couple_probability_matrix().unwrap();
        for row in &matrix {
            let mass: f64 = row.iter().flatten().sum();
            prop_assert!((mass - 1.0).abs() < 1e-9);
        }
    }

    // Applying the same truth booth twice changes nothing the second time.
    #[test]
    fn truth_booth_is_idempotent(a in 0u8..6, b in 0u8..6, confirmed: bool) {
        prop_assume!(a != b);
        let registry = registry_of(6);
        let universe = matchup_solver::generate_universe(&registry).unwrap();
        let constraint = Constraint::TruthBooth {
            couple: Couple::new(a, b).unwrap(),
            confirmed,
        };
        let once = constraint.apply(&universe, &registry).unwrap();
        let twice = constraint.apply(&once, &registry).unwrap();
        prop_assert_eq!(once, twice);
    }
}
