//! Opaque versioned snapshot of a deduction in progress: the registered
//! names, the remaining scenarios as couple lists, and the derived couple
//! counts. A version mismatch on load is a hard error, never a best-effort
//! parse.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SolverError;
use crate::model::entity::Registry;
use crate::model::scenario::{Couple, Scenario, ScenarioSet};
use crate::store::ScenarioStore;

pub const SNAPSHOT_VERSION: u32 = 1;

type IdPair = (u8, u8);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    version: u32,
    contestants: Vec<String>,
    scenarios: Vec<Vec<IdPair>>,
    couple_counts: Vec<(IdPair, u64)>,
}

impl Snapshot {
    pub fn capture(store: &ScenarioStore) -> Snapshot {
        let n = store.registry().len();
        Snapshot {
            version: SNAPSHOT_VERSION,
            contestants: store.registry().names().to_vec(),
            scenarios: store
                .scenarios()
                .iter()
                .map(|s| s.couples(n).iter().map(|c| c.members()).collect())
                .collect(),
            couple_counts: store
                .couple_counts()
                .into_iter()
                .map(|(couple, count)| (couple.members(), count as u64))
                .collect(),
        }
    }

    /// Rebuilds a store behaving identically to the captured one. The
    /// persisted couple counts are derived data; the restored store
    /// recomputes them from the scenarios on demand.
    pub fn restore(self) -> Result<ScenarioStore, SolverError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SolverError::SnapshotVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let registry = Registry::new(self.contestants)?;
        let n = registry.len();
        let mut scenarios = Vec::with_capacity(self.scenarios.len());
        for couples in self.scenarios {
            let mut parsed = Vec::with_capacity(couples.len());
            let mut seen = vec![false; n];
            for (a, b) in couples {
                if a as usize >= n || b as usize >= n {
                    return Err(SolverError::SnapshotInvalid(format!(
                        "couple ({a}, {b}) is outside the {n}-contestant population"
                    )));
                }
                for id in [a, b] {
                    if seen[id as usize] {
                        return Err(SolverError::SnapshotInvalid(format!(
                            "a stored scenario pairs contestant id {id} more than once"
                        )));
                    }
                    seen[id as usize] = true;
                }
                parsed.push(Couple::new(a, b)?);
            }
            if parsed.len() != n / 2 || seen.iter().any(|&s| !s) {
                return Err(SolverError::SnapshotInvalid(
                    "a stored scenario is not a perfect matching".to_string(),
                ));
            }
            scenarios.push(Scenario::from_couples(parsed, n));
        }
        Ok(ScenarioStore::from_parts(registry, ScenarioSet::new(scenarios)))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SolverError> {
        let payload = serde_json::to_vec(self)?;
        fs::write(path.as_ref(), payload)?;
        debug!(path = %path.as_ref().display(), "saved snapshot");
        Ok(())
    }

    /// The version field is checked before the full payload is decoded, so
    /// a format bump fails with the version error even if the rest of the
    /// schema drifted.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Snapshot, SolverError> {
        let payload = fs::read(path.as_ref())?;
        let value: serde_json::Value = serde_json::from_slice(&payload)?;
        let found = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| {
                SolverError::SnapshotInvalid("snapshot has no version field".to_string())
            })?;
        if found != SNAPSHOT_VERSION as u64 {
            return Err(SolverError::SnapshotVersion {
                found: found as u32,
                expected: SNAPSHOT_VERSION,
            });
        }
        let snapshot: Snapshot = serde_json::from_value(value)?;
        debug!(path = %path.as_ref().display(), "loaded snapshot");
        Ok(snapshot)
    }
}
