//! The scenario store owns the registry and the current consistent
//! scenario collection, and derives all per-couple statistics from it on
//! demand. Every derived query fails on an exhausted store: an empty set
//! means the accumulated observations contradict each other, and that must
//! never be papered over with defaults.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::debug;

use crate::constraint::Constraint;
use crate::error::SolverError;
use crate::generate::generate_universe;
use crate::model::entity::{ContestantId, Registry};
use crate::model::scenario::{all_couples, Couple, ScenarioSet};
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoupleStatistic {
    pub count: usize,
    pub probability: f64,
}

/// Partners tied at the maximum probability for one contestant.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatches {
    pub partners: Vec<String>,
    pub probability: f64,
}

impl BestMatches {
    /// A maximum of exactly 1.0 means the pairing is present in every
    /// remaining scenario.
    pub fn is_confirmed(&self) -> bool {
        self.probability == 1.0
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioStore {
    registry: Registry,
    scenarios: ScenarioSet,
}

impl ScenarioStore {
    /// Builds the initial universe for the population. This is the one
    /// expensive construction; everything after only shrinks it.
    pub fn new(registry: Registry) -> Result<ScenarioStore, SolverError> {
        let scenarios = generate_universe(&registry)?;
        Ok(ScenarioStore {
            registry,
            scenarios,
        })
    }

    pub(crate) fn from_parts(registry: Registry, scenarios: ScenarioSet) -> ScenarioStore {
        ScenarioStore {
            registry,
            scenarios,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    /// True once contradictory observations have emptied the store. The
    /// only way to inspect exhaustion without tripping the derived-query
    /// error.
    pub fn is_exhausted(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn size(&self) -> Result<usize, SolverError> {
        self.non_empty()?;
        Ok(self.scenarios.len())
    }

    fn non_empty(&self) -> Result<(), SolverError> {
        if self.scenarios.is_empty() {
            Err(SolverError::EmptyScenarioSet)
        } else {
            Ok(())
        }
    }

    /// Count and probability for every couple over the population, zero
    /// entries included for couples absent from every remaining scenario.
    pub fn couple_statistics(&self) -> Result<BTreeMap<Couple, CoupleStatistic>, SolverError> {
        self.non_empty()?;
        let total = self.scenarios.len() as f64;
        Ok(self
            .couple_counts()
            .into_iter()
            .map(|(couple, count)| {
                (
                    couple,
                    CoupleStatistic {
                        count,
                        probability: count as f64 / total,
                    },
                )
            })
            .collect())
    }

    /// Raw per-couple scenario counts, zero-filled; usable even when the
    /// store is exhausted (snapshots capture it in that state too).
    pub(crate) fn couple_counts(&self) -> BTreeMap<Couple, usize> {
        let n = self.registry.len();
        all_couples(n)
            .map(|couple| {
                let count = self
                    .scenarios
                    .iter()
                    .filter(|s| s.contains(couple, n))
                    .count();
                (couple, count)
            })
            .collect()
    }

    /// N x N probability table for rendering; symmetric off the diagonal,
    /// `None` on it (no self-pairing).
    pub fn couple_probability_matrix(&self) -> Result<Vec<Vec<Option<f64>>>, SolverError> {
        let statistics = self.couple_statistics()?;
        let n = self.registry.len();
        let mut matrix = vec![vec![None; n]; n];
        for (couple, statistic) in statistics {
            let (lo, hi) = couple.members();
            matrix[lo as usize][hi as usize] = Some(statistic.probability);
            matrix[hi as usize][lo as usize] = Some(statistic.probability);
        }
        Ok(matrix)
    }

    /// Every partner of `name` tied at the maximum couple probability,
    /// plus that maximum. Ties are all returned, never an arbitrary pick.
    pub fn best_matches(&self, name: &str) -> Result<BestMatches, SolverError> {
        let id = self.registry.id(name)?;
        self.non_empty()?;
        let statistics = self.couple_statistics()?;
        let candidates = statistics.iter().filter_map(|(couple, statistic)| {
            couple.contains(id).then(|| {
                let (lo, hi) = couple.members();
                let partner = if lo == id { hi } else { lo };
                (partner, statistic.probability)
            })
        });
        let (probability, partners) =
            stats::arg_max(candidates).ok_or(SolverError::EmptyScenarioSet)?;
        Ok(BestMatches {
            partners: partners
                .into_iter()
                .filter_map(|partner: ContestantId| self.registry.name(partner))
                .map(str::to_string)
                .collect(),
            probability,
        })
    }

    /// Truth booth observation: `couple` confirmed in or excluded from the
    /// true matching. Replaces the owned collection wholesale.
    pub fn apply_truth_booth(&mut self, couple: Couple, confirmed: bool) -> Result<(), SolverError> {
        self.apply(Constraint::TruthBooth { couple, confirmed }, "truth booth")
    }

    /// Ceremony observation: a full proposed matching and its revealed
    /// number of correct couples.
    pub fn apply_matchup_ceremony(
        &mut self,
        matchup: Vec<Couple>,
        beams: u32,
    ) -> Result<(), SolverError> {
        self.apply(Constraint::Ceremony { matchup, beams }, "matchup ceremony")
    }

    fn apply(&mut self, constraint: Constraint, kind: &str) -> Result<(), SolverError> {
        let before = self.scenarios.len();
        let started = Instant::now();
        self.scenarios = constraint.apply(&self.scenarios, &self.registry)?;
        debug!(
            kind,
            before,
            after = self.scenarios.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "applied observation"
        );
        Ok(())
    }
}
