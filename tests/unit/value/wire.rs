use super::*;
use serde_json::json;

fn decode(v: serde_json::Value) -> ScriptValue {
    serde_json::from_value(v).unwrap()
}

#[test]
fn decodes_nested_binary_and_unary_nodes() {
    let v = decode(json!({
        "type": "add",
        "valueA": { "type": "variable", "value": "L0" },
        "valueB": { "type": "not", "value": { "type": "true" } }
    }));
    assert_eq!(
        v,
        ScriptValue::binary(
            BinaryOp::Add,
            ScriptValue::variable("L0"),
            ScriptValue::unary(UnaryOp::Not, ScriptValue::True)
        )
    );
}

#[test]
fn missing_operand_decodes_as_absent() {
    let v = decode(json!({ "type": "add", "valueA": { "type": "variable", "value": "5" } }));
    assert_eq!(
        v,
        ScriptValue::Binary {
            op: BinaryOp::Add,
            value_a: Some(Box::new(ScriptValue::variable("5"))),
            value_b: None,
        }
    );
}

#[test]
fn encodes_project_file_shape() {
    let v = ScriptValue::binary(
        BinaryOp::BAnd,
        ScriptValue::property("player", ActorProperty::Pxpos),
        ScriptValue::number(7),
    );
    assert_eq!(
        serde_json::to_value(&v).unwrap(),
        json!({
            "type": "bAND",
            "valueA": { "type": "property", "target": "player", "property": "pxpos" },
            "valueB": { "type": "number", "value": 7 }
        })
    );
}

#[test]
fn absent_operands_are_omitted_when_encoding() {
    let v = ScriptValue::Unary {
        op: UnaryOp::Rnd,
        value: None,
    };
    assert_eq!(serde_json::to_value(&v).unwrap(), json!({ "type": "rnd" }));
}

#[test]
fn integral_floats_are_accepted_as_numbers() {
    assert_eq!(
        decode(json!({ "type": "number", "value": 4.0 })),
        ScriptValue::number(4)
    );
    assert!(serde_json::from_value::<ScriptValue>(json!({ "type": "number", "value": 4.5 })).is_err());
}

#[test]
fn rejects_unknown_types_and_bad_payloads() {
    assert!(!is_script_value(&json!({ "type": "pow", "valueA": null })));
    assert!(!is_script_value(&json!({ "type": "variable", "value": 3 })));
    assert!(!is_script_value(&json!({ "type": "property", "target": "player" })));
    assert!(!is_script_value(&json!({ "type": "property", "target": "player", "property": "zpos" })));
    assert!(!is_script_value(&json!({ "type": "abs", "value": 3 })));
    assert!(!is_script_value(&json!("add")));
    assert!(!is_script_value(&serde_json::Value::Null));
}

#[test]
fn accepts_valid_clipboard_payloads() {
    assert!(is_script_value(&json!({ "type": "true" })));
    assert!(is_script_value(&json!({ "type": "expression", "value": "$V0$ + 1" })));
    assert!(is_script_value(&json!({
        "type": "atan2",
        "valueA": { "type": "property", "target": "actor1", "property": "ypos" },
        "valueB": { "type": "number", "value": 10 }
    })));
}

#[test]
fn json_round_trip_preserves_tree() {
    let v = ScriptValue::binary(
        BinaryOp::Min,
        ScriptValue::unary(UnaryOp::BNot, ScriptValue::expression("$L1$ * 2")),
        ScriptValue::False,
    );
    let s = serde_json::to_string(&v).unwrap();
    assert_eq!(ScriptValue::from_json_str(&s).unwrap(), v);
}
