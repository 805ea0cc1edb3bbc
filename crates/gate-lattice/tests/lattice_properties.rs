use gate_lattice::{
    annihilates, bezout_vector, canonicalize, canonicalize_int, dot, gcd_all,
    hermite_normal_form, integer_rank, orthogonalize_against, ratio, right_kernel,
    smith_normal_form, IntMatrix,
};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use proptest::prelude::*;

fn small_matrix() -> impl Strategy<Value = IntMatrix> {
    (1usize..5, 1usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(-6i64..7, cols), rows).prop_map(|rows| {
            IntMatrix::from_rows(
                rows.into_iter()
                    .map(|row| row.into_iter().map(BigInt::from).collect())
                    .collect(),
            )
            .unwrap()
        })
    })
}

fn rational_vector() -> impl Strategy<Value = Vec<BigRational>> {
    prop::collection::vec((-20i64..21, 1i64..10), 1..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(numer, denom)| ratio(numer, denom).unwrap())
            .collect()
    })
}

fn int_vector(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<BigInt>> {
    prop::collection::vec(-40i64..41, len)
        .prop_map(|values| values.into_iter().map(BigInt::from).collect())
}

fn is_unit(value: &BigInt) -> bool {
    value.abs().is_one()
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(values in rational_vector()) {
        prop_assume!(values.iter().any(|value| !value.is_zero()));
        let once = canonicalize(&values).unwrap();
        let twice = canonicalize(&once.to_rational()).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(canonicalize_int(once.entries()).unwrap(), once.clone());
    }

    #[test]
    fn canonical_form_is_primitive(values in rational_vector()) {
        prop_assume!(values.iter().any(|value| !value.is_zero()));
        let primitive = canonicalize(&values).unwrap();
        prop_assert!(gcd_all(primitive.entries()).is_one());
        let leading = primitive.entries().iter().find(|value| !value.is_zero()).unwrap();
        prop_assert!(leading.is_positive());
    }

    #[test]
    fn kernel_vectors_are_annihilated(m in small_matrix()) {
        for generator in right_kernel(&m).unwrap() {
            let image = m.mul_vec(generator.entries()).unwrap();
            prop_assert!(image.iter().all(Zero::is_zero));
        }
    }

    #[test]
    fn kernel_dimension_matches_rank(m in small_matrix()) {
        let basis = right_kernel(&m).unwrap();
        let rank = integer_rank(&m).unwrap();
        prop_assert_eq!(basis.len(), m.cols() - rank);
    }

    #[test]
    fn smith_form_is_a_unimodular_diagonalization(m in small_matrix()) {
        let snf = smith_normal_form(&m).unwrap();
        prop_assert!(snf.divisibility_chain_holds());
        prop_assert!(snf.invariants.iter().all(|d| d.is_positive()));
        prop_assert_eq!(snf.rank, integer_rank(&m).unwrap());
        let product = snf.left.mul(&m).unwrap().mul(&snf.right).unwrap();
        prop_assert_eq!(&product, &snf.diagonal);
        for row in 0..product.rows() {
            for col in 0..product.cols() {
                let entry = product.get(row, col);
                if row == col && row < snf.rank {
                    prop_assert_eq!(entry, &snf.invariants[row]);
                } else {
                    prop_assert!(entry.is_zero());
                }
            }
        }
        prop_assert!(is_unit(&snf.left.determinant().unwrap()));
        prop_assert!(is_unit(&snf.right.determinant().unwrap()));
    }

    #[test]
    fn hermite_form_preserves_row_span(m in small_matrix()) {
        let form = hermite_normal_form(&m).unwrap();
        prop_assert_eq!(form.transform.mul(&m).unwrap(), form.h.clone());
        prop_assert!(is_unit(&form.transform.determinant().unwrap()));
        for row in form.rank..form.h.rows() {
            prop_assert!(form.h.row(row).iter().all(Zero::is_zero));
        }
        for (row, &col) in form.pivots.iter().enumerate() {
            let pivot = form.h.get(row, col);
            prop_assert!(pivot.is_positive());
            for above in 0..row {
                let entry = form.h.get(above, col);
                prop_assert!(!entry.is_negative() && entry < pivot);
            }
        }
    }

    #[test]
    fn bezout_identity_holds(values in int_vector(1..7)) {
        prop_assume!(values.iter().any(|value| !value.is_zero()));
        let k = canonicalize_int(&values).unwrap();
        let w = bezout_vector(k.entries()).unwrap();
        prop_assert_eq!(dot(k.entries(), &w).unwrap(), BigInt::one());
    }

    #[test]
    fn orthogonalized_columns_are_orthogonal(m in small_matrix(), seed in int_vector(4..5)) {
        let raw: Vec<BigInt> = seed.into_iter().take(m.rows()).collect();
        prop_assume!(raw.iter().any(|value| !value.is_zero()));
        let k = canonicalize_int(&raw).unwrap();
        let w = bezout_vector(k.entries()).unwrap();
        let projected = orthogonalize_against(&m, k.entries(), &w).unwrap();
        prop_assert_eq!(projected.shape(), m.shape());
        prop_assert!(annihilates(k.entries(), &projected));
    }
}
