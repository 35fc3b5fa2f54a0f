use serde::Deserialize as _;

use crate::{
    foundation::error::ScriptValueError,
    value::model::{ActorProperty, BinaryOp, ScriptValue, UnaryOp},
};

/// Flat project-file shape of a script value node: `{"type": ..., ...}`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawScriptValue {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<RawPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_a: Option<Box<ScriptValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_b: Option<Box<ScriptValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property: Option<ActorProperty>,
}

/// The `value` field is overloaded: number, identifier/text, or operand node.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPayload {
    Int(i64),
    Float(f64),
    Text(String),
    Node(Box<ScriptValue>),
}

impl RawScriptValue {
    fn bare(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            value: None,
            value_a: None,
            value_b: None,
            target: None,
            property: None,
        }
    }
}

impl From<ScriptValue> for RawScriptValue {
    fn from(v: ScriptValue) -> Self {
        let mut raw = RawScriptValue::bare(v.tag());
        match v {
            ScriptValue::Number(n) => raw.value = Some(RawPayload::Int(n)),
            ScriptValue::Variable(s) | ScriptValue::Expression(s) => {
                raw.value = Some(RawPayload::Text(s))
            }
            ScriptValue::Property { target, property } => {
                raw.target = Some(target);
                raw.property = Some(property);
            }
            ScriptValue::True | ScriptValue::False => {}
            ScriptValue::Binary {
                value_a, value_b, ..
            } => {
                raw.value_a = value_a;
                raw.value_b = value_b;
            }
            ScriptValue::Unary { value, .. } => raw.value = value.map(RawPayload::Node),
        }
        raw
    }
}

impl TryFrom<RawScriptValue> for ScriptValue {
    type Error = ScriptValueError;

    fn try_from(raw: RawScriptValue) -> Result<Self, Self::Error> {
        let kind = raw.kind.as_str();
        if let Some(op) = BinaryOp::from_tag(kind) {
            return Ok(ScriptValue::Binary {
                op,
                value_a: raw.value_a,
                value_b: raw.value_b,
            });
        }
        if let Some(op) = UnaryOp::from_tag(kind) {
            let value = match raw.value {
                None => None,
                Some(RawPayload::Node(node)) => Some(node),
                Some(_) => {
                    return Err(ScriptValueError::validation(format!(
                        "'{kind}' operand must be a script value"
                    )));
                }
            };
            return Ok(ScriptValue::Unary { op, value });
        }

        match kind {
            "number" => match raw.value {
                Some(RawPayload::Int(n)) => Ok(ScriptValue::Number(n)),
                Some(RawPayload::Float(f)) if f.fract() == 0.0 && f.is_finite() => {
                    Ok(ScriptValue::Number(f as i64))
                }
                _ => Err(ScriptValueError::validation(
                    "'number' value must be an integer",
                )),
            },
            "variable" => match raw.value {
                Some(RawPayload::Text(s)) => Ok(ScriptValue::Variable(s)),
                _ => Err(ScriptValueError::validation(
                    "'variable' value must be a string",
                )),
            },
            "expression" => match raw.value {
                Some(RawPayload::Text(s)) => Ok(ScriptValue::Expression(s)),
                None => Ok(ScriptValue::Expression(String::new())),
                _ => Err(ScriptValueError::validation(
                    "'expression' value must be a string",
                )),
            },
            "property" => match (raw.target, raw.property) {
                (Some(target), Some(property)) => Ok(ScriptValue::Property { target, property }),
                _ => Err(ScriptValueError::validation(
                    "'property' requires 'target' and 'property'",
                )),
            },
            "true" => Ok(ScriptValue::True),
            "false" => Ok(ScriptValue::False),
            other => Err(ScriptValueError::validation(format!(
                "unknown script value type '{other}'"
            ))),
        }
    }
}

/// Return `true` when arbitrary JSON decodes as a [`ScriptValue`].
pub fn is_script_value(value: &serde_json::Value) -> bool {
    ScriptValue::deserialize(value).is_ok()
}

#[cfg(test)]
#[path = "../../tests/unit/value/wire.rs"]
mod tests;
