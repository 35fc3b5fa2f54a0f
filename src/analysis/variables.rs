use crate::{expression::lexer::scan_variable_refs, value::model::ScriptValue};

/// Every variable id referenced by `value`, in pre-order traversal order.
///
/// `expression` nodes contribute the `$..$` references of their text, left to
/// right. Duplicates are kept.
pub fn extract_script_value_variables(value: &ScriptValue) -> Vec<String> {
    let mut out = Vec::new();
    for node in value.walk() {
        match node {
            ScriptValue::Variable(id) => out.push(id.clone()),
            ScriptValue::Expression(text) => out.extend(scan_variable_refs(text)),
            ScriptValue::Number(_)
            | ScriptValue::Property { .. }
            | ScriptValue::True
            | ScriptValue::False
            | ScriptValue::Binary { .. }
            | ScriptValue::Unary { .. } => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/variables.rs"]
mod tests;
