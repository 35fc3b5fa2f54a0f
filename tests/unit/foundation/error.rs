use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScriptValueError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ScriptValueError::parse("x")
            .to_string()
            .contains("parse error:")
    );
    assert!(
        ScriptValueError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
}

#[test]
fn json_errors_map_to_serde_variant() {
    let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = ScriptValueError::from(e);
    assert!(matches!(err, ScriptValueError::Serde(_)));
    assert!(err.to_string().starts_with("serialization error:"), "{err}");
}

#[test]
fn decoding_bad_json_reports_serde_error() {
    let err = crate::ScriptValue::from_json_str(r#"{"type": "pow"}"#).unwrap_err();
    assert!(matches!(err, ScriptValueError::Serde(_)));
    assert!(err.to_string().contains("unknown script value type 'pow'"), "{err}");
}
