pub mod entity {
    use std::collections::HashMap;

    use crate::error::SolverError;
    use crate::model::scenario::Couple;

    pub type ContestantId = u8;

    /// Hard cap on the population size. C(16, 2) = 120 couples fit the
    /// 128-bit scenario mask, and (15)!! ≈ 2.0e6 scenarios is already the
    /// edge of what the quadratic beam analysis can chew through; the
    /// (N-1)!! growth makes anything larger hopeless regardless.
    pub const MAX_POPULATION: usize = 16;

    /// Bijective name <-> id table, fixed at registration.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Registry {
        names: Vec<String>,
        ids: HashMap<String, ContestantId>,
    }

    impl Registry {
        /// Ids are assigned in input order and never reassigned.
        pub fn new<I, S>(names: I) -> Result<Registry, SolverError>
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let names: Vec<String> = names.into_iter().map(Into::into).collect();
            if names.is_empty() {
                return Err(SolverError::EmptyPopulation);
            }
            if names.len() > MAX_POPULATION {
                return Err(SolverError::PopulationTooLarge(names.len()));
            }
            let mut ids = HashMap::new();
            for (id, name) in names.iter().enumerate() {
                if ids.insert(name.clone(), id as ContestantId).is_some() {
                    return Err(SolverError::DuplicateContestant(name.clone()));
                }
            }
            Ok(Registry { names, ids })
        }

        pub fn len(&self) -> usize {
            self.names.len()
        }

        pub fn is_empty(&self) -> bool {
            self.names.is_empty()
        }

        pub fn names(&self) -> &[String] {
            &self.names
        }

        pub fn ids(&self) -> impl Iterator<Item = ContestantId> {
            0..self.names.len() as ContestantId
        }

        pub fn id(&self, name: &str) -> Result<ContestantId, SolverError> {
            self.ids
                .get(name)
                .copied()
                .ok_or_else(|| SolverError::UnknownContestant(name.to_string()))
        }

        pub fn name(&self, id: ContestantId) -> Option<&str> {
            self.names.get(id as usize).map(String::as_str)
        }

        /// Canonical couple from two registered names.
        pub fn couple(&self, a: &str, b: &str) -> Result<Couple, SolverError> {
            Couple::new(self.id(a)?, self.id(b)?)
        }
    }
}

pub mod scenario {
    use itertools::Itertools;

    use crate::error::SolverError;
    use crate::model::entity::ContestantId;

    /// Unordered pair of distinct contestants, stored canonically as lo < hi.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Couple {
        lo: ContestantId,
        hi: ContestantId,
    }

    impl Couple {
        pub fn new(a: ContestantId, b: ContestantId) -> Result<Couple, SolverError> {
            if a == b {
                return Err(SolverError::SelfPairing(a));
            }
            Ok(Couple {
                lo: a.min(b),
                hi: a.max(b),
            })
        }

        pub fn members(&self) -> (ContestantId, ContestantId) {
            (self.lo, self.hi)
        }

        pub fn contains(&self, id: ContestantId) -> bool {
            self.lo == id || self.hi == id
        }

        /// Stable global index of this couple among all C(n, 2) couples over
        /// a population of n, in lexicographic (lo, hi) order. This index is
        /// the couple's bit position in every `Scenario` mask.
        pub fn index(&self, n: usize) -> usize {
            Couple::index_of(self.lo, self.hi, n)
        }

        pub(crate) fn index_of(a: ContestantId, b: ContestantId, n: usize) -> usize {
            let (lo, hi) = (a.min(b) as usize, a.max(b) as usize);
            lo * n - lo * (lo + 1) / 2 + (hi - lo - 1)
        }

        pub(crate) fn bit(a: ContestantId, b: ContestantId, n: usize) -> u128 {
            1u128 << Couple::index_of(a, b, n)
        }
    }

    /// Every couple over a population of n, in global index order.
    pub fn all_couples(n: usize) -> impl Iterator<Item = Couple> {
        (0..n as ContestantId)
            .tuple_combinations()
            .map(|(lo, hi)| Couple { lo, hi })
    }

    /// One perfect matching, as a fixed-width bitmask over the global couple
    /// index. Mask equality makes two matchings equal regardless of the
    /// order their couples were produced in, and the beam between two
    /// scenarios is a single popcount of a bitwise AND.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Scenario(u128);

    impl Scenario {
        pub(crate) fn from_mask(mask: u128) -> Scenario {
            Scenario(mask)
        }

        pub fn from_couples<I>(couples: I, n: usize) -> Scenario
        where
            I: IntoIterator<Item = Couple>,
        {
            let mask = couples
                .into_iter()
                .fold(0u128, |mask, c| mask | (1u128 << c.index(n)));
            Scenario(mask)
        }

        pub fn contains(&self, couple: Couple, n: usize) -> bool {
            self.0 & (1u128 << couple.index(n)) != 0
        }

        /// Beam: cardinality of the couple-set intersection.
        pub fn overlap(&self, other: &Scenario) -> u32 {
            (self.0 & other.0).count_ones()
        }

        pub fn num_couples(&self) -> u32 {
            self.0.count_ones()
        }

        pub fn couples(&self, n: usize) -> Vec<Couple> {
            all_couples(n)
                .filter(|c| self.0 & (1u128 << c.index(n)) != 0)
                .collect()
        }
    }

    /// The currently consistent scenarios, sorted and distinct. Constraint
    /// application replaces the whole collection; nothing mutates it in
    /// place.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ScenarioSet {
        scenarios: Vec<Scenario>,
    }

    impl ScenarioSet {
        pub fn new(mut scenarios: Vec<Scenario>) -> ScenarioSet {
            scenarios.sort_unstable();
            scenarios.dedup();
            ScenarioSet { scenarios }
        }

        pub fn len(&self) -> usize {
            self.scenarios.len()
        }

        pub fn is_empty(&self) -> bool {
            self.scenarios.is_empty()
        }

        pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
            self.scenarios.iter()
        }

        pub fn as_slice(&self) -> &[Scenario] {
            &self.scenarios
        }

        pub fn contains(&self, scenario: &Scenario) -> bool {
            self.scenarios.binary_search(scenario).is_ok()
        }

        pub fn is_subset_of(&self, other: &ScenarioSet) -> bool {
            self.scenarios.iter().all(|s| other.contains(s))
        }

        /// New set holding the scenarios matching the predicate; sorted
        /// order is inherited from self.
        pub fn filtered<P>(&self, pred: P) -> ScenarioSet
        where
            P: Fn(&Scenario) -> bool,
        {
            ScenarioSet {
                scenarios: self.scenarios.iter().copied().filter(|s| pred(s)).collect(),
            }
        }
    }
}
