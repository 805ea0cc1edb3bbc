#![deny(missing_docs)]
#![doc = "Finite constraint systems over a shared candidate level, with satisfiability checks and minimal-unsatisfiable-core extraction inside a declared core."]

pub mod constraint;
pub mod mus;
pub mod system;

pub use constraint::{Constraint, ConstraintKind, SystemState};
pub use mus::{
    find_mus, mus_report, verify_minimality, MinimalityCheck, MinimalityTrial, MusOutcome,
    MusReport,
};
pub use system::{ConstraintSystem, SystemSpec};
