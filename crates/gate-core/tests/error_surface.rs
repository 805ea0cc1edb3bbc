use gate_core::errors::{dimension_mismatch, ErrorInfo, GateError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("rows", "3")
        .with_context("reason", "example")
}

#[test]
fn dimension_error_surface() {
    let err = dimension_mismatch("row-join", "row counts differ", 3, 2);
    assert_eq!(err.code(), "row-join");
    assert_eq!(err.info().context["expected"], "3");
    assert_eq!(err.info().context["found"], "2");
}

#[test]
fn arithmetic_error_surface() {
    let err = GateError::ZeroDenominator(sample_info("Z001", "denominator is zero"));
    assert_eq!(err.info().code, "Z001");
    let err = GateError::DivisionNotExact(sample_info("D001", "remainder"));
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn lattice_error_surface() {
    let err = GateError::ZeroVectorCanonicalization(sample_info("V001", "zero vector"));
    assert_eq!(err.info().code, "V001");
    let err = GateError::BezoutImpossible(sample_info("B001", "gcd is 2"));
    assert!(err.to_string().starts_with("bezout impossible"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = GateError::InputTooLarge(sample_info("L001", "too big").with_hint("raise limits"));
    let text = err.to_string();
    assert!(text.starts_with("input too large: [L001] too big"));
    assert!(text.contains("rows=3"));
    assert!(text.contains("hint: raise limits"));
}

#[test]
fn errors_round_trip_json() {
    let err = GateError::Constraint(sample_info("C001", "unknown id"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Constraint\""));
    let decoded: GateError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn limits_surface() {
    use gate_core::Limits;

    let unbounded = Limits::unbounded();
    assert!(unbounded.check(10_000, 10_000).is_ok());
    let limits = Limits {
        max_rows: 0,
        max_cols: 0,
    };
    assert_eq!(limits.check(1, 1).unwrap_err().code(), "matrix-too-large");
    assert!(limits.sanitised().check(1, 1).is_ok());
    let err = Limits::default().check(65, 1).unwrap_err();
    assert!(matches!(err, GateError::InputTooLarge(_)));
}
