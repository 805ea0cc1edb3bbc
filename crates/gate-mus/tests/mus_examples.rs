use gate_core::{from_json_slice, to_canonical_json_bytes, Verdict};
use gate_mus::{
    find_mus, mus_report, verify_minimality, Constraint, ConstraintKind, ConstraintSystem,
    MusOutcome, MusReport, SystemSpec, SystemState,
};
use num_bigint::BigInt;
use proptest::prelude::*;

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

fn three_way_conflict() -> ConstraintSystem {
    let cap = Constraint::new(
        "C",
        ConstraintKind::AbsAtMost {
            bound: BigInt::from(5),
        },
    );
    ConstraintSystem::new(
        SystemState::with_range(1, 10),
        vec![multiple("A", 2), multiple("B", 3), cap],
    )
    .unwrap()
}

#[test]
fn pairwise_satisfiable_triple_is_its_own_mus() {
    let system = three_way_conflict();
    assert!(!system.satisfiable::<&str>(&[]));
    assert!(system.satisfiable_subset(&["A", "B"]));
    assert!(system.satisfiable_subset(&["B", "C"]));
    assert!(system.satisfiable_subset(&["A", "C"]));

    let outcome = find_mus(&system, &ids(&["A", "B", "C"])).unwrap();
    assert_eq!(outcome, MusOutcome::Unsat { mus: ids(&["A", "B", "C"]) });

    let check = verify_minimality(&system, outcome.ids()).unwrap();
    assert!(check.minimal);
    assert!(check.core_unsat);
    assert_eq!(check.trials.len(), 3);
    assert!(check.trials.iter().all(|trial| trial.satisfiable));
}

#[test]
fn non_minimal_set_fails_verification() {
    let system = ConstraintSystem::new(
        SystemState::with_range(1, 4),
        vec![multiple("A", 5), multiple("B", 2)],
    )
    .unwrap();
    let check = verify_minimality(&system, &ids(&["A", "B"])).unwrap();
    assert!(!check.minimal);
    assert_eq!(check.trials[0].removed, "A");
    assert!(check.trials[0].satisfiable);
    assert!(!check.trials[1].satisfiable);

    let outcome = find_mus(&system, &ids(&["A", "B"])).unwrap();
    assert_eq!(outcome.ids(), ids(&["A"]).as_slice());
}

const LEVEL_SYSTEM: &str = r#"
name: SYSTEM_S_K6
state:
  domain: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
  flags:
    non_split: true
  facts:
    rank_yukawa_uv: 3
    rank_yukawa_ir: 3
  required_labels: ["+1/2", "+1/3", "+1/6", "-1/2", "-1/3", "-1/6"]
constraints:
  - id: inflow_link
    kind: flag
    fact: non_split
  - id: mod2_target
    kind: multiple
    modulus: 2
  - id: mod3_target
    kind: multiple
    modulus: 3
  - id: cterms_lock
    kind: allowed-set
    allowed: ["+1/2", "+1/3", "+1/6", "-1/2", "-1/3", "-1/6"]
  - id: fedele_UV
    kind: fact-at-least
    fact: rank_yukawa_uv
    bound: 3
  - id: fedele_IR
    kind: fact-at-least
    fact: rank_yukawa_ir
    bound: 3
  - id: level_cap
    kind: abs-at-most
    bound: "5"
core: [inflow_link, mod2_target, mod3_target, cterms_lock, fedele_UV, fedele_IR, level_cap]
"#;

#[test]
fn level_system_from_yaml() {
    let spec: SystemSpec = serde_yaml::from_str(LEVEL_SYSTEM).unwrap();
    let system = spec.build().unwrap();
    assert_eq!(system.constraints().len(), 7);
    assert!(system.satisfiable(&["level_cap"]));
    assert_eq!(system.witness(&["level_cap"]), Some(BigInt::from(6)));

    let report = mus_report(&spec.name, &system, &spec.core_ids()).unwrap();
    assert!(!report.sat);
    assert_eq!(
        report.outcome,
        MusOutcome::Unsat {
            mus: ids(&["mod2_target", "mod3_target", "level_cap"])
        }
    );
    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(
        report.status_lines(),
        vec![
            "SYSTEM_S_K6_SAT:UNSAT".to_owned(),
            "MUS:mod2_target,mod3_target,level_cap".to_owned(),
            "MUS_MINIMALITY:PASS".to_owned(),
        ]
    );

    let bytes = to_canonical_json_bytes(&report).unwrap();
    let restored: MusReport = from_json_slice(&bytes).unwrap();
    assert_eq!(report, restored);
}

#[test]
fn spec_round_trips_through_json() {
    let spec: SystemSpec = serde_yaml::from_str(LEVEL_SYSTEM).unwrap();
    let bytes = to_canonical_json_bytes(&spec).unwrap();
    let restored: SystemSpec = from_json_slice(&bytes).unwrap();
    assert_eq!(restored, spec);
}

proptest! {
    #[test]
    fn deletion_core_is_minimal(
        moduli in prop::collection::vec(2i64..8, 1..5),
        cap in 1i64..30,
    ) {
        let mut constraints: Vec<Constraint> = moduli
            .iter()
            .enumerate()
            .map(|(idx, modulus)| multiple(&format!("m{idx}"), *modulus))
            .collect();
        constraints.push(Constraint::new(
            "cap",
            ConstraintKind::AbsAtMost { bound: BigInt::from(cap) },
        ));
        let system = ConstraintSystem::new(SystemState::with_range(1, 40), constraints).unwrap();
        let core = system.ids();
        match find_mus(&system, &core).unwrap() {
            MusOutcome::NotApplicable => prop_assert!(system.satisfiable::<&str>(&[])),
            MusOutcome::Unsat { mus } => {
                let check = verify_minimality(&system, &mus).unwrap();
                prop_assert!(check.core_unsat);
                prop_assert!(check.minimal);
            }
        }
    }
}
