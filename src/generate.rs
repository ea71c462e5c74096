//! Enumeration of the full matchup universe: every perfect matching over
//! the registered population. There are exactly (N-1)!! of them, so this is
//! factorial work and the hard ceiling on supportable population sizes;
//! N = 16 (2,027,025 scenarios) is about the practical limit.

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::error::SolverError;
use crate::model::entity::{ContestantId, Registry, MAX_POPULATION};
use crate::model::scenario::{Couple, Scenario, ScenarioSet};

/// All distinct perfect matchings over the registered population.
///
/// The branches for the first contestant's partner are independent, so they
/// are evaluated in parallel and unioned by canonical mask equality.
pub fn generate_universe(registry: &Registry) -> Result<ScenarioSet, SolverError> {
    let n = registry.len();
    if n == 0 {
        return Err(SolverError::EmptyPopulation);
    }
    if n % 2 != 0 {
        return Err(SolverError::OddPopulation(n));
    }
    if n > MAX_POPULATION {
        return Err(SolverError::PopulationTooLarge(n));
    }

    let started = Instant::now();
    let ids: Vec<ContestantId> = registry.ids().collect();
    let masks: Vec<u128> = (1..ids.len())
        .into_par_iter()
        .flat_map(|i| {
            let first_pair = Couple::bit(ids[0], ids[i], n);
            let rest: Vec<ContestantId> = ids[1..]
                .iter()
                .copied()
                .filter(|&p| p != ids[i])
                .collect();
            pair_up(&rest, n)
                .into_iter()
                .map(|sub| sub | first_pair)
                .collect::<Vec<u128>>()
        })
        .collect();

    // The fixed-first-contestant recursion never emits the same matching
    // twice, but correctness rests on canonical equality, not on that
    // property; dedup through a set regardless.
    let distinct: HashSet<u128> = masks.into_iter().collect();
    let universe = ScenarioSet::new(distinct.into_iter().map(Scenario::from_mask).collect());
    debug!(
        population = n,
        scenarios = universe.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated matchup universe"
    );
    Ok(universe)
}

/// Matchings over `people`: fix the first, pair it with each of the others,
/// recurse on the rest. An empty slice yields the single empty matching.
fn pair_up(people: &[ContestantId], n: usize) -> Vec<u128> {
    if people.is_empty() {
        return vec![0];
    }
    let first = people[0];
    let mut matchups = Vec::new();
    for i in 1..people.len() {
        let pair = Couple::bit(first, people[i], n);
        let rest: Vec<ContestantId> = people[1..]
            .iter()
            .copied()
            .filter(|&p| p != people[i])
            .collect();
        for sub in pair_up(&rest, n) {
            matchups.push(sub | pair);
        }
    }
    matchups
}
