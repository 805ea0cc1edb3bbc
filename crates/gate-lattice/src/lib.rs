#![deny(missing_docs)]
#![doc = "Exact integer-lattice arithmetic for gate certificates: normal forms, integer kernels, Bezout vectors and lattice re-orthogonalization."]

//! Every routine works over `BigInt`/`BigRational` and is deterministic, so
//! two runs over the same input produce bit-identical certificates.

pub mod arith;
pub mod bezout;
pub mod canonical;
pub mod charges;
pub mod gates;
pub mod kernel;
pub mod matrix;
pub mod normal;
pub mod orthogonal;
pub mod serde_num;
pub mod synth;

pub use arith::{
    dot, exact_div, format_rational, gcd_all, ints, lcm_all, parse_rational, ratio, sign,
    to_rational,
};
pub use bezout::{bezout_vector, extended_gcd};
pub use canonical::{
    canonicalize, canonicalize_int, dedup_primitive, is_primitive, try_canonicalize,
    PrimitiveVector,
};
pub use charges::ChargeModel;
pub use gates::{
    congruence_gate, crt_combine, integrality_gate, residue_gate, unimodular_gate, GateCheck,
};
pub use kernel::{
    kernel_matrix, left_kernel, rational_rank, rational_rref, right_kernel,
    right_kernel_of_rational, right_kernel_rational,
};
pub use matrix::{ensure_within, IntMatrix, Matrix, RatMatrix};
pub use normal::{hermite_normal_form, integer_rank, smith_normal_form, HermiteForm, SmithForm};
pub use orthogonal::{annihilates, orthogonalize_against};
pub use synth::{
    field_charges, synthesize, synthesize_within, ChargeGenerator, ChargeLattice,
    FieldChargeReport, LatticeSpec, SynthesisReport, UvConfig,
};
