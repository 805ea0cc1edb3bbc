//! Constraint descriptions and the state they are evaluated against.

use std::collections::{BTreeMap, BTreeSet};

use gate_core::errors::{constraint_error, ErrorInfo, GateError};
use gate_lattice::parse_rational;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

/// Immutable data every constraint is evaluated against.
///
/// Candidate constraints restrict a single unknown integer level drawn from
/// `domain`; static constraints are predicates over the named facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    /// Finite candidate levels.
    #[serde(with = "gate_lattice::serde_num::vec")]
    pub domain: Vec<BigInt>,
    /// Named boolean facts.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Named integer facts.
    #[serde(default, with = "gate_lattice::serde_num::map")]
    pub facts: BTreeMap<String, BigInt>,
    /// Rational labels an allowed-set constraint must reproduce exactly.
    #[serde(default)]
    pub required_labels: Vec<String>,
}

impl SystemState {
    /// State whose domain is every level in `lo..=hi`.
    pub fn with_range(lo: i64, hi: i64) -> Self {
        Self {
            domain: (lo..=hi).map(BigInt::from).collect(),
            ..Self::default()
        }
    }

    /// Sets a boolean fact.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Sets an integer fact.
    pub fn with_fact(mut self, name: impl Into<String>, value: impl Into<BigInt>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    /// Sets the required label set.
    pub fn with_required_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Typed payload of a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConstraintKind {
    /// Level is a multiple of `modulus`.
    Multiple {
        /// Positive modulus.
        #[serde(with = "gate_lattice::serde_num::num")]
        modulus: BigInt,
    },
    /// Level is congruent to `residue` modulo `modulus`.
    Congruence {
        /// Positive modulus.
        #[serde(with = "gate_lattice::serde_num::num")]
        modulus: BigInt,
        /// Target residue.
        #[serde(with = "gate_lattice::serde_num::num")]
        residue: BigInt,
    },
    /// `|level| >= bound`.
    AbsAtLeast {
        /// Lower bound.
        #[serde(with = "gate_lattice::serde_num::num")]
        bound: BigInt,
    },
    /// `|level| <= bound`.
    AbsAtMost {
        /// Upper bound.
        #[serde(with = "gate_lattice::serde_num::num")]
        bound: BigInt,
    },
    /// Level is none of `values`.
    Excludes {
        /// Forbidden levels.
        #[serde(with = "gate_lattice::serde_num::vec")]
        values: Vec<BigInt>,
    },
    /// Boolean fact `fact` equals `expected`.
    Flag {
        /// Fact name.
        fact: String,
        /// Required value.
        #[serde(default = "default_expected")]
        expected: bool,
    },
    /// Integer fact `fact` is at least `bound`.
    FactAtLeast {
        /// Fact name.
        fact: String,
        /// Lower bound.
        #[serde(with = "gate_lattice::serde_num::num")]
        bound: BigInt,
    },
    /// The allowed labels equal the state's required label set.
    AllowedSet {
        /// Allowed rational labels such as `+1/2`.
        allowed: Vec<String>,
    },
}

fn default_expected() -> bool {
    true
}

/// A named constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique identifier.
    pub id: String,
    /// Payload.
    #[serde(flatten)]
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Creates a constraint.
    pub fn new(id: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Constraint with its payload checked and pre-evaluated where possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Predicate {
    /// Test on the candidate level.
    Level(LevelTest),
    /// Predicate over the facts, fixed once the state is known.
    Fixed(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LevelTest {
    Congruent { modulus: BigInt, residue: BigInt },
    AbsAtLeast(BigInt),
    AbsAtMost(BigInt),
    Excludes(BTreeSet<BigInt>),
}

impl LevelTest {
    pub(crate) fn holds(&self, level: &BigInt) -> bool {
        match self {
            LevelTest::Congruent { modulus, residue } => &level.mod_floor(modulus) == residue,
            LevelTest::AbsAtLeast(bound) => &level.abs() >= bound,
            LevelTest::AbsAtMost(bound) => &level.abs() <= bound,
            LevelTest::Excludes(values) => !values.contains(level),
        }
    }
}

fn positive_modulus(id: &str, modulus: &BigInt) -> Result<(), GateError> {
    if modulus.is_positive() {
        return Ok(());
    }
    Err(GateError::Constraint(
        ErrorInfo::new("non-positive-modulus", "modulus must be positive")
            .with_context("id", id)
            .with_context("modulus", modulus.to_string()),
    ))
}

fn missing_fact(id: &str, fact: &str) -> GateError {
    GateError::Constraint(
        ErrorInfo::new("unknown-fact", format!("constraint `{id}` reads an undefined fact"))
            .with_context("id", id)
            .with_context("fact", fact),
    )
}

fn label_set(labels: &[String]) -> Result<BTreeSet<BigRational>, GateError> {
    labels.iter().map(|label| parse_rational(label)).collect()
}

impl Constraint {
    pub(crate) fn compile(&self, state: &SystemState) -> Result<Predicate, GateError> {
        let id = self.id.as_str();
        let predicate = match &self.kind {
            ConstraintKind::Multiple { modulus } => {
                positive_modulus(id, modulus)?;
                Predicate::Level(LevelTest::Congruent {
                    modulus: modulus.clone(),
                    residue: BigInt::zero(),
                })
            }
            ConstraintKind::Congruence { modulus, residue } => {
                positive_modulus(id, modulus)?;
                Predicate::Level(LevelTest::Congruent {
                    modulus: modulus.clone(),
                    residue: residue.mod_floor(modulus),
                })
            }
            ConstraintKind::AbsAtLeast { bound } => {
                Predicate::Level(LevelTest::AbsAtLeast(bound.clone()))
            }
            ConstraintKind::AbsAtMost { bound } => Predicate::Level(LevelTest::AbsAtMost(bound.clone())),
            ConstraintKind::Excludes { values } => {
                Predicate::Level(LevelTest::Excludes(values.iter().cloned().collect()))
            }
            ConstraintKind::Flag { fact, expected } => {
                let value = state.flags.get(fact).ok_or_else(|| missing_fact(id, fact))?;
                Predicate::Fixed(value == expected)
            }
            ConstraintKind::FactAtLeast { fact, bound } => {
                let value = state.facts.get(fact).ok_or_else(|| missing_fact(id, fact))?;
                Predicate::Fixed(value >= bound)
            }
            ConstraintKind::AllowedSet { allowed } => {
                let allowed = label_set(allowed)
                    .map_err(|err| constraint_error("label-parse", format!("`{id}`: {err}")))?;
                let required = label_set(&state.required_labels)
                    .map_err(|err| constraint_error("label-parse", format!("required labels: {err}")))?;
                Predicate::Fixed(allowed == required)
            }
        };
        Ok(predicate)
    }
}
