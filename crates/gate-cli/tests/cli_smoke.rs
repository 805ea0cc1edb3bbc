use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn gate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gate"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run gate")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).expect("read certificate")).expect("parse certificate")
}

#[test]
fn normal_form_certificate() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("m.yaml");
    fs::write(&input, "rows: [[2, 4], [1, 2]]\n").unwrap();
    let out = dir.path().join("out/nf.json");

    let output = gate(&[
        "normal-form",
        "--in",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let lines = stdout_lines(&output);
    assert_eq!(lines.last().map(String::as_str), Some("NORMAL_FORM:PASS"));
    assert!(lines.iter().any(|line| line.starts_with("U_DET:PASS:det=")));

    let cert = read_json(&out);
    assert_eq!(cert["gate"], "normal-form");
    assert!(cert["provenance"]["input_hash"]
        .as_str()
        .unwrap()
        .starts_with("sha256:"));
    assert_eq!(cert["report"]["smith"]["invariants"], serde_json::json!(["1"]));
    assert_eq!(
        cert["report"]["hermite"]["h"]["entries"],
        serde_json::json!([["1", "2"], ["0", "0"]])
    );
}

#[test]
fn identical_inputs_give_identical_certificates() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("m.yaml");
    fs::write(&input, "rows: [[2, 0, 0], [0, 3, 0]]\n").unwrap();
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");
    for out in [&first, &second] {
        let output = gate(&[
            "kernel",
            "--in",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ]);
        assert!(output.status.success());
    }
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    let cert = read_json(&first);
    assert_eq!(cert["report"]["dimension"], 1);
    assert_eq!(cert["report"]["basis"], serde_json::json!([["0", "0", "1"]]));
}

#[test]
fn left_kernel_of_lattice_blocks() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("b.yaml");
    fs::write(&input, "rows: [[1, 0], [0, 1], [1, 1]]\n").unwrap();
    let out = dir.path().join("k.json");
    let output = gate(&[
        "kernel",
        "--side",
        "left",
        "--in",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines.contains(&"KERNEL_RANK:PASS:ok".to_owned()));
    assert!(lines.contains(&"KERNEL:PASS".to_owned()));
    let cert = read_json(&out);
    assert_eq!(cert["report"]["side"], "left");
    assert_eq!(cert["report"]["basis"], serde_json::json!([["1", "1", "-1"]]));
}

const NARROW_MODEL: &str = "\
field_order: [Q, uR, H, X]
yukawa_active: [QuH]
CdotGG: [[1, 0], [0, 1], [1, 1]]
L: [[2], [2], [4]]
";

#[test]
fn synth_writes_report_and_updated_model() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("model.yaml");
    fs::write(&input, NARROW_MODEL).unwrap();
    let out = dir.path().join("synth.json");
    let model_out = dir.path().join("next/model.yaml");

    let output = gate(&[
        "synth",
        "--in",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--coeffs",
        "3",
        "--model-out",
        model_out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout_lines(&output).contains(&"SYNTH:PASS".to_owned()));

    let cert = read_json(&out);
    assert_eq!(cert["report"]["k"], serde_json::json!(["1", "1", "-1"]));
    assert_eq!(cert["report"]["k_in_kernel"], true);
    let updated = fs::read_to_string(&model_out).unwrap();
    assert!(updated.contains("CdotGG"));
    assert!(updated.contains("field_order"));

    let charges = gate(&["charges", "--in", input.to_str().unwrap()]);
    assert!(charges.status.success());
    let cert: Value = serde_json::from_slice(&charges.stdout).expect("stdout is one JSON document");
    assert_eq!(cert["gate"], "field-charges");
    assert_eq!(cert["report"]["b2"], 3);
    let stderr = String::from_utf8_lossy(&charges.stderr);
    assert!(stderr
        .lines()
        .any(|line| line == "FIELD_CHARGES:PASS:1 generator(s)"));
}

#[test]
fn synth_rejects_wrong_coefficient_count() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("model.yaml");
    fs::write(&input, NARROW_MODEL).unwrap();
    let output = gate(&["synth", "--in", input.to_str().unwrap(), "--coeffs", "1,2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("coefficient"));
}

const SYSTEM: &str = "\
name: TRIPLE
state:
  domain: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
constraints:
  - {id: A, kind: multiple, modulus: 2}
  - {id: B, kind: multiple, modulus: 3}
  - {id: C, kind: abs-at-most, bound: 5}
";

#[test]
fn mus_prints_status_lines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("system.yaml");
    fs::write(&input, SYSTEM).unwrap();
    let out = dir.path().join("mus.json");
    let output = gate(&[
        "mus",
        "--in",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_lines(&output),
        vec!["TRIPLE_SAT:UNSAT", "MUS:A,B,C", "MUS_MINIMALITY:PASS"]
    );
    let cert = read_json(&out);
    assert_eq!(cert["report"]["verdict"], "PASS");
    assert_eq!(cert["report"]["outcome"]["status"], "unsat");
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    let output = gate(&["mus", "--in", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}
