use thiserror::Error;

use crate::model::entity::{ContestantId, MAX_POPULATION};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("population is empty")]
    EmptyPopulation,
    #[error("population size {0} is odd; a perfect matching needs an even population")]
    OddPopulation(usize),
    #[error("population size {0} exceeds the supported maximum of {MAX_POPULATION}")]
    PopulationTooLarge(usize),
    #[error("duplicate contestant `{0}`")]
    DuplicateContestant(String),
    #[error("unknown contestant `{0}`")]
    UnknownContestant(String),
    #[error("a couple must pair two distinct contestants (got id {0} twice)")]
    SelfPairing(ContestantId),
    #[error("proposed matchup is not a perfect matching: {0}")]
    InvalidMatchup(String),
    #[error("no scenarios remain; the accumulated observations are contradictory")]
    EmptyScenarioSet,
    #[error("snapshot format version {found} is unsupported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },
    #[error("snapshot is not restorable: {0}")]
    SnapshotInvalid(String),
    #[error("snapshot serialization failed: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
