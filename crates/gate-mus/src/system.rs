//! Validated constraint systems and satisfiability.

use std::collections::{BTreeMap, BTreeSet};

use gate_core::errors::{ErrorInfo, GateError};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, Predicate, SystemState};

/// A set of named constraints over one immutable [`SystemState`].
///
/// Construction checks every payload once; evaluation is then infallible and
/// independent of the order of the constraints.
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    state: SystemState,
    constraints: Vec<Constraint>,
    predicates: Vec<Predicate>,
    index: BTreeMap<String, usize>,
}

impl ConstraintSystem {
    /// Validates `constraints` against `state`.
    ///
    /// Fails on an empty domain, duplicate ids, non-positive moduli, undefined
    /// facts and unparsable labels.
    pub fn new(mut state: SystemState, constraints: Vec<Constraint>) -> Result<Self, GateError> {
        if state.domain.is_empty() {
            return Err(GateError::Constraint(
                ErrorInfo::new("empty-domain", "the candidate domain has no levels")
                    .with_hint("list at least one candidate level under `domain`"),
            ));
        }
        state.domain.sort();
        state.domain.dedup();

        let mut index = BTreeMap::new();
        let mut predicates = Vec::with_capacity(constraints.len());
        for (position, constraint) in constraints.iter().enumerate() {
            if index.insert(constraint.id.clone(), position).is_some() {
                return Err(GateError::Constraint(
                    ErrorInfo::new("duplicate-constraint", "constraint ids must be unique")
                        .with_context("id", constraint.id.as_str()),
                ));
            }
            predicates.push(constraint.compile(&state)?);
        }
        Ok(Self {
            state,
            constraints,
            predicates,
            index,
        })
    }

    /// Evaluation state.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraint ids in declaration order.
    pub fn ids(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.id.clone()).collect()
    }

    /// Whether `id` names a constraint.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Fails with `unknown-constraint` for the first id not in the system.
    pub fn check_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), GateError> {
        let unknown = ids
            .iter()
            .map(AsRef::as_ref)
            .find(|id: &&str| !self.contains(id));
        match unknown {
            Some(id) => Err(GateError::Constraint(
                ErrorInfo::new("unknown-constraint", "id does not name a constraint")
                    .with_context("id", id)
                    .with_context("known", self.ids().join(",")),
            )),
            None => Ok(()),
        }
    }

    fn first_witness<F>(&self, active: F) -> Option<BigInt>
    where
        F: Fn(&str) -> bool,
    {
        let mut level_tests = Vec::new();
        for (constraint, predicate) in self.constraints.iter().zip(&self.predicates) {
            if !active(&constraint.id) {
                continue;
            }
            match predicate {
                Predicate::Fixed(true) => {}
                Predicate::Fixed(false) => return None,
                Predicate::Level(test) => level_tests.push(test),
            }
        }
        self.state
            .domain
            .iter()
            .find(|level| level_tests.iter().all(|test| test.holds(level)))
            .cloned()
    }

    /// Whether the constraints not listed in `excluded` hold together.
    ///
    /// Ids in `excluded` that name no constraint are ignored.
    pub fn satisfiable<S: AsRef<str>>(&self, excluded: &[S]) -> bool {
        self.witness(excluded).is_some()
    }

    /// Whether the constraints listed in `kept` hold together, ignoring every
    /// other constraint.
    pub fn satisfiable_subset<S: AsRef<str>>(&self, kept: &[S]) -> bool {
        let kept: BTreeSet<&str> = kept.iter().map(AsRef::as_ref).collect();
        self.first_witness(|id| kept.contains(id)).is_some()
    }

    /// Smallest level satisfying every constraint not in `excluded`, or
    /// `None` when they are jointly unsatisfiable.
    pub fn witness<S: AsRef<str>>(&self, excluded: &[S]) -> Option<BigInt> {
        let excluded: BTreeSet<&str> = excluded.iter().map(AsRef::as_ref).collect();
        self.first_witness(|id| !excluded.contains(id))
    }
}

/// File form of a constraint system together with its declared core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSpec {
    /// Label used in status lines and reports.
    #[serde(default = "SystemSpec::default_name")]
    pub name: String,
    /// Evaluation state.
    pub state: SystemState,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Candidate core for the MUS search; empty means every constraint.
    #[serde(default)]
    pub core: Vec<String>,
}

impl SystemSpec {
    fn default_name() -> String {
        "SYSTEM".to_owned()
    }

    /// Builds the validated system.
    pub fn build(&self) -> Result<ConstraintSystem, GateError> {
        ConstraintSystem::new(self.state.clone(), self.constraints.clone())
    }

    /// The declared core, or every constraint id when none is declared.
    pub fn core_ids(&self) -> Vec<String> {
        if self.core.is_empty() {
            self.constraints.iter().map(|c| c.id.clone()).collect()
        } else {
            self.core.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintKind;

    fn multiple(id: &str, modulus: i64) -> Constraint {
        Constraint::new(
            id,
            ConstraintKind::Multiple {
                modulus: BigInt::from(modulus),
            },
        )
    }

    #[test]
    fn exclusion_and_restriction() {
        let cap = Constraint::new(
            "cap",
            ConstraintKind::AbsAtMost {
                bound: BigInt::from(5),
            },
        );
        let system = ConstraintSystem::new(
            SystemState::with_range(1, 12),
            vec![multiple("two", 2), multiple("three", 3), cap],
        )
        .unwrap();
        assert!(!system.satisfiable::<&str>(&[]));
        assert!(system.satisfiable(&["cap"]));
        assert_eq!(system.witness(&["cap"]), Some(BigInt::from(6)));
        assert!(system.satisfiable_subset(&["two", "cap"]));
        assert!(!system.satisfiable_subset(&["two", "three", "cap"]));
        assert!(system.satisfiable(&["unknown"]) == system.satisfiable::<&str>(&[]));
    }

    #[test]
    fn construction_errors() {
        let err = ConstraintSystem::new(SystemState::default(), Vec::new()).unwrap_err();
        assert_eq!(err.code(), "empty-domain");
        let err = ConstraintSystem::new(
            SystemState::with_range(0, 3),
            vec![multiple("a", 2), multiple("a", 3)],
        )
        .unwrap_err();
        assert_eq!(err.code(), "duplicate-constraint");
        let system =
            ConstraintSystem::new(SystemState::with_range(0, 3), vec![multiple("a", 2)]).unwrap();
        assert_eq!(system.check_ids(&["b"]).unwrap_err().code(), "unknown-constraint");
    }
}
