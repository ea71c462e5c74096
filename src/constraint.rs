//! Observation constraints and their pure application. Filtering never
//! fails on a valid argument, even when it leaves nothing: an empty result
//! only surfaces as an error once derived statistics are queried.

use crate::error::SolverError;
use crate::model::entity::Registry;
use crate::model::scenario::{Couple, Scenario, ScenarioSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// One couple confirmed or denied to be part of the true matching.
    TruthBooth { couple: Couple, confirmed: bool },
    /// A full proposed matching and the revealed number of correct couples.
    Ceremony { matchup: Vec<Couple>, beams: u32 },
}

impl Constraint {
    /// New set of scenarios consistent with this observation, always a
    /// subset of `current`. An unsatisfiable `beams` value yields an empty
    /// set, not an error.
    pub fn apply(
        &self,
        current: &ScenarioSet,
        registry: &Registry,
    ) -> Result<ScenarioSet, SolverError> {
        let n = registry.len();
        match self {
            Constraint::TruthBooth { couple, confirmed } => {
                check_registered(*couple, registry)?;
                Ok(current.filtered(|s| s.contains(*couple, n) == *confirmed))
            }
            Constraint::Ceremony { matchup, beams } => {
                let proposed = validate_matchup(matchup, registry)?;
                Ok(current.filtered(|s| s.overlap(&proposed) == *beams))
            }
        }
    }
}

fn check_registered(couple: Couple, registry: &Registry) -> Result<(), SolverError> {
    let (_, hi) = couple.members();
    if (hi as usize) < registry.len() {
        Ok(())
    } else {
        Err(SolverError::UnknownContestant(format!("id {hi}")))
    }
}

/// A ceremony lineup must be a perfect matching over the full population:
/// every contestant in exactly one couple.
fn validate_matchup(matchup: &[Couple], registry: &Registry) -> Result<Scenario, SolverError> {
    let n = registry.len();
    let mut seen = vec![false; n];
    for couple in matchup {
        let (lo, hi) = couple.members();
        if hi as usize >= n {
            return Err(SolverError::InvalidMatchup(format!(
                "contestant id {hi} is not registered"
            )));
        }
        for id in [lo, hi] {
            if seen[id as usize] {
                return Err(SolverError::InvalidMatchup(format!(
                    "{} appears more than once",
                    registry.name(id).unwrap_or("?")
                )));
            }
            seen[id as usize] = true;
        }
    }
    if matchup.len() != n / 2 || seen.iter().any(|&s| !s) {
        return Err(SolverError::InvalidMatchup(format!(
            "{} couples do not cover all {n} contestants",
            matchup.len()
        )));
    }
    Ok(Scenario::from_couples(matchup.iter().copied(), n))
}
