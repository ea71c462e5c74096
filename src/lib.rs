//! Deduce a hidden perfect matching from partial observations.
//!
//! A fixed population is paired off into couples by some unknown complete
//! matching. Two kinds of observation narrow it down: a truth booth
//! (confirms or denies one couple) and a matchup ceremony (reveals how many
//! couples of a proposed full matching are correct, its "beams"). The
//! crate enumerates the full universe of perfect matchings once, filters it
//! as observations arrive, and derives couple probabilities and all-pairs
//! overlap statistics used to rank candidate next ceremonies.
//!
//! Enumeration is factorial ((N-1)!! scenarios for N contestants) and the
//! beam analysis is quadratic in the remaining scenario count, so callers
//! must budget accordingly; populations are capped at
//! [`model::entity::MAX_POPULATION`].

pub mod beam;
pub mod constraint;
pub mod error;
pub mod generate;
pub mod model;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use beam::{BeamAnalysis, BeamProfile, Extremal, ExtremalSummary};
pub use constraint::Constraint;
pub use error::SolverError;
pub use generate::generate_universe;
pub use model::entity::{ContestantId, Registry, MAX_POPULATION};
pub use model::scenario::{all_couples, Couple, Scenario, ScenarioSet};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use stats::Summary;
pub use store::{BestMatches, CoupleStatistic, ScenarioStore};
