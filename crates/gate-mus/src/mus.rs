//! Minimal unsatisfiable cores over a declared candidate core.
//!
//! The search never enumerates subsets of the whole system. It starts from a
//! caller-declared core, which must already be unsatisfiable on its own, and
//! drops members one at a time while the remainder stays unsatisfiable.

use gate_core::errors::{ErrorInfo, GateError};
use gate_core::Verdict;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::system::ConstraintSystem;

/// Result of a MUS search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum MusOutcome {
    /// The full system is satisfiable; there is no core to report.
    NotApplicable,
    /// The system is unsatisfiable and `mus` is a minimal core.
    Unsat {
        /// Core ids in declaration order.
        mus: Vec<String>,
    },
}

impl MusOutcome {
    /// Core ids; empty when not applicable.
    pub fn ids(&self) -> &[String] {
        match self {
            MusOutcome::NotApplicable => &[],
            MusOutcome::Unsat { mus } => mus,
        }
    }
}

/// One deletion trial: the core without `removed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalityTrial {
    /// Removed constraint id.
    pub removed: String,
    /// Whether the remaining core is satisfiable.
    pub satisfiable: bool,
}

/// Audit table of a minimality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalityCheck {
    /// Every single deletion made the core satisfiable.
    pub minimal: bool,
    /// The core itself is unsatisfiable.
    pub core_unsat: bool,
    /// Trials in core order.
    pub trials: Vec<MinimalityTrial>,
}

fn without(ids: &[String], skip: usize) -> Vec<&str> {
    ids.iter()
        .enumerate()
        .filter(|(idx, _)| *idx != skip)
        .map(|(_, id)| id.as_str())
        .collect()
}

fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

/// Finds a minimal unsatisfiable core inside `core`.
///
/// Returns [`MusOutcome::NotApplicable`] when the full system is
/// satisfiable. Fails with `unknown-constraint` for ids outside the system
/// and with `core-not-unsat` when the declared core is satisfiable on its
/// own even though the full system is not.
pub fn find_mus(system: &ConstraintSystem, core: &[String]) -> Result<MusOutcome, GateError> {
    system.check_ids(core)?;
    if system.satisfiable::<&str>(&[]) {
        tracing::debug!("system satisfiable; MUS search not applicable");
        return Ok(MusOutcome::NotApplicable);
    }
    let mut mus = dedup_ids(core);
    if system.satisfiable_subset(&mus) {
        return Err(GateError::Constraint(
            ErrorInfo::new(
                "core-not-unsat",
                "the declared core is satisfiable; the conflict lies outside it",
            )
            .with_context("core", mus.join(","))
            .with_hint("declare every interacting constraint in `core`"),
        ));
    }

    for id in dedup_ids(core) {
        let Some(position) = mus.iter().position(|member| member == &id) else {
            continue;
        };
        let remainder = without(&mus, position);
        let still_unsat = !system.satisfiable_subset(&remainder);
        tracing::debug!(removed = %id, still_unsat, "deletion trial");
        if still_unsat {
            mus.remove(position);
        }
    }
    Ok(MusOutcome::Unsat { mus })
}

/// Re-checks `mus` by removing each member in turn.
pub fn verify_minimality(
    system: &ConstraintSystem,
    mus: &[String],
) -> Result<MinimalityCheck, GateError> {
    system.check_ids(mus)?;
    let trials: Vec<MinimalityTrial> = mus
        .iter()
        .enumerate()
        .map(|(idx, id)| MinimalityTrial {
            removed: id.clone(),
            satisfiable: system.satisfiable_subset(&without(mus, idx)),
        })
        .collect();
    let minimal = trials.iter().all(|trial| trial.satisfiable);
    Ok(MinimalityCheck {
        minimal,
        core_unsat: !system.satisfiable_subset(mus),
        trials,
    })
}

/// Serializable summary of a MUS run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusReport {
    /// Name of the system.
    pub name: String,
    /// Whether the full system is satisfiable.
    pub sat: bool,
    /// Smallest satisfying level when satisfiable.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "witness_text")]
    pub witness: Option<BigInt>,
    /// Search outcome.
    pub outcome: MusOutcome,
    /// Minimality audit, present for unsatisfiable systems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimality: Option<MinimalityCheck>,
    /// `PASS` for a verified minimal core, `FAIL` otherwise, `ND` when the
    /// system is satisfiable.
    pub verdict: Verdict,
}

impl MusReport {
    /// `NAME_SAT:...`, `MUS:...` and `MUS_MINIMALITY:...` status lines.
    pub fn status_lines(&self) -> Vec<String> {
        let sat = if self.sat { "SAT" } else { "UNSAT" };
        let mus = match &self.outcome {
            MusOutcome::NotApplicable => "EMPTY".to_owned(),
            MusOutcome::Unsat { mus } => mus.join(","),
        };
        vec![
            format!("{}_SAT:{sat}", self.name),
            format!("MUS:{mus}"),
            format!("MUS_MINIMALITY:{}", self.verdict),
        ]
    }
}

mod witness_text {
    use gate_lattice::serde_num;
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Level(#[serde(with = "serde_num::num")] BigInt);

    pub fn serialize<S: Serializer>(value: &Option<BigInt>, serializer: S) -> Result<S::Ok, S::Error> {
        value.clone().map(Level).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<BigInt>, D::Error> {
        Ok(Option::<Level>::deserialize(deserializer)?.map(|level| level.0))
    }
}

/// Runs the search and the minimality audit in one pass.
pub fn mus_report(
    name: &str,
    system: &ConstraintSystem,
    core: &[String],
) -> Result<MusReport, GateError> {
    let witness = system.witness::<&str>(&[]);
    let outcome = find_mus(system, core)?;
    let (minimality, verdict) = match &outcome {
        MusOutcome::NotApplicable => (None, Verdict::NotDetermined),
        MusOutcome::Unsat { mus } => {
            let check = verify_minimality(system, mus)?;
            let verdict = Verdict::from_pass(check.minimal && check.core_unsat);
            (Some(check), verdict)
        }
    };
    Ok(MusReport {
        name: name.to_owned(),
        sat: witness.is_some(),
        witness,
        outcome,
        minimality,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, ConstraintKind, SystemState};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    fn multiple(id: &str, modulus: i64) -> Constraint {
        Constraint::new(
            id,
            ConstraintKind::Multiple {
                modulus: BigInt::from(modulus),
            },
        )
    }

    #[test]
    fn satisfiable_system_is_not_applicable() {
        let system =
            ConstraintSystem::new(SystemState::with_range(1, 12), vec![multiple("two", 2)]).unwrap();
        let outcome = find_mus(&system, &ids(&["two"])).unwrap();
        assert_eq!(outcome, MusOutcome::NotApplicable);
        assert!(outcome.ids().is_empty());
        let report = mus_report("S", &system, &ids(&["two"])).unwrap();
        assert_eq!(report.verdict, Verdict::NotDetermined);
        assert_eq!(report.witness, Some(BigInt::from(2)));
        assert_eq!(report.status_lines()[1], "MUS:EMPTY");
    }

    #[test]
    fn core_that_misses_the_conflict_is_rejected() {
        let system = ConstraintSystem::new(
            SystemState::with_range(1, 5),
            vec![multiple("two", 2), multiple("seven", 7)],
        )
        .unwrap();
        let err = find_mus(&system, &ids(&["two"])).unwrap_err();
        assert_eq!(err.code(), "core-not-unsat");
        let err = find_mus(&system, &ids(&["nine"])).unwrap_err();
        assert_eq!(err.code(), "unknown-constraint");
    }
}
