//! All-pairs overlap analysis. For S remaining scenarios this is S²
//! popcount intersections, the dominant cost in the whole crate; each row
//! depends only on a read-only view of the set, so rows are computed in
//! parallel. The extremal summary surfaces the matchups whose overlap
//! distribution is most discriminating for a prospective next ceremony; it
//! deliberately exposes every computed extremal set and no single
//! combining policy.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::error::SolverError;
use crate::model::scenario::{Scenario, ScenarioSet};
use crate::stats::{self, Summary};

/// One scenario's overlap distribution against the whole set.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamProfile {
    /// Overlap against every scenario, in set order; includes the self
    /// term, which always equals N/2.
    pub beams: Vec<u32>,
    /// Aggregates over `beams`; `summary.mode` is `None` when no overlap
    /// value strictly repeats most often.
    pub summary: Summary,
    /// Distinct overlap value -> number of scenarios producing it.
    pub histogram: BTreeMap<u32, u32>,
    /// Aggregates over the histogram's bucket sizes.
    pub bucket_summary: Summary,
}

/// Scenarios tied at one extremal aggregate value.
#[derive(Debug, Clone, PartialEq)]
pub struct Extremal<V> {
    pub value: V,
    pub scenarios: Vec<Scenario>,
}

/// Global extrema across all profiles, ties preserved. The mode-based
/// entries are absent when no scenario has a unique mode to rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremalSummary {
    pub max_min_beams: Extremal<u32>,
    pub max_mean_beams: Extremal<f64>,
    pub max_median_beams: Extremal<f64>,
    pub max_mode_beams: Option<Extremal<u32>>,
    pub min_max_buckets: Extremal<u32>,
    pub min_mean_buckets: Extremal<f64>,
    pub min_median_buckets: Extremal<f64>,
    pub min_mode_buckets: Option<Extremal<u32>>,
}

#[derive(Debug, Clone)]
pub struct BeamAnalysis {
    scenarios: Vec<Scenario>,
    profiles: Vec<BeamProfile>,
}

impl BeamAnalysis {
    /// Full beam profile of every scenario against every scenario.
    pub fn analyze(set: &ScenarioSet) -> Result<BeamAnalysis, SolverError> {
        if set.is_empty() {
            return Err(SolverError::EmptyScenarioSet);
        }
        let started = Instant::now();
        let scenarios: Vec<Scenario> = set.iter().copied().collect();
        let profiles: Vec<BeamProfile> = scenarios
            .par_iter()
            .map(|scenario| profile(scenario, &scenarios))
            .collect();
        debug!(
            scenarios = scenarios.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analyzed beam profiles"
        );
        Ok(BeamAnalysis {
            scenarios,
            profiles,
        })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn profiles(&self) -> impl Iterator<Item = (&Scenario, &BeamProfile)> {
        self.scenarios.iter().zip(self.profiles.iter())
    }

    pub fn profile_of(&self, scenario: &Scenario) -> Option<&BeamProfile> {
        let at = self.scenarios.binary_search(scenario).ok()?;
        self.profiles.get(at)
    }

    /// Ties are always whole sets; an aggregate never elects an arbitrary
    /// single winner.
    pub fn extremal_summary(&self) -> ExtremalSummary {
        ExtremalSummary {
            max_min_beams: self.fold_extremal(|p| p.summary.min, Direction::Max),
            max_mean_beams: self.fold_extremal(|p| p.summary.mean, Direction::Max),
            max_median_beams: self.fold_extremal(|p| p.summary.median, Direction::Max),
            max_mode_beams: self.fold_extremal_mode(|p| p.summary.mode, Direction::Max),
            min_max_buckets: self.fold_extremal(|p| p.bucket_summary.max, Direction::Min),
            min_mean_buckets: self.fold_extremal(|p| p.bucket_summary.mean, Direction::Min),
            min_median_buckets: self.fold_extremal(|p| p.bucket_summary.median, Direction::Min),
            min_mode_buckets: self.fold_extremal_mode(|p| p.bucket_summary.mode, Direction::Min),
        }
    }

    fn fold_extremal<V, F>(&self, aggregate: F, direction: Direction) -> Extremal<V>
    where
        V: PartialOrd + PartialEq + Copy,
        F: Fn(&BeamProfile) -> V,
    {
        let mut value = aggregate(&self.profiles[0]);
        let mut scenarios = vec![self.scenarios[0]];
        for (scenario, profile) in self.scenarios[1..].iter().zip(&self.profiles[1..]) {
            let candidate = aggregate(profile);
            if direction.better(candidate, value) {
                value = candidate;
                scenarios = vec![*scenario];
            } else if candidate == value {
                scenarios.push(*scenario);
            }
        }
        Extremal { value, scenarios }
    }

    /// Scenarios without a unique mode do not compete for the mode-based
    /// extrema.
    fn fold_extremal_mode<F>(&self, aggregate: F, direction: Direction) -> Option<Extremal<u32>>
    where
        F: Fn(&BeamProfile) -> Option<u32>,
    {
        let candidates = self
            .scenarios
            .iter()
            .zip(&self.profiles)
            .filter_map(|(scenario, profile)| aggregate(profile).map(|mode| (*scenario, mode)));
        let folded = match direction {
            Direction::Max => stats::arg_max(candidates),
            Direction::Min => stats::arg_min(candidates),
        };
        folded.map(|(value, scenarios)| Extremal { value, scenarios })
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Max,
    Min,
}

impl Direction {
    fn better<V: PartialOrd>(&self, candidate: V, current: V) -> bool {
        match self {
            Direction::Max => candidate > current,
            Direction::Min => candidate < current,
        }
    }
}

fn profile(scenario: &Scenario, all: &[Scenario]) -> BeamProfile {
    let beams: Vec<u32> = all.iter().map(|other| scenario.overlap(other)).collect();
    let mut histogram: BTreeMap<u32, u32> = BTreeMap::new();
    for &beam in &beams {
        *histogram.entry(beam).or_insert(0) += 1;
    }
    let bucket_sizes: Vec<u32> = histogram.values().copied().collect();
    // `beams` has one entry per scenario and the set is non-empty, so both
    // summaries exist.
    let summary = stats::summarize(&beams).unwrap_or(EMPTY_SUMMARY);
    let bucket_summary = stats::summarize(&bucket_sizes).unwrap_or(EMPTY_SUMMARY);
    BeamProfile {
        beams,
        summary,
        histogram,
        bucket_summary,
    }
}

const EMPTY_SUMMARY: Summary = Summary {
    min: 0,
    max: 0,
    mean: 0.0,
    median: 0.0,
    mode: None,
};
