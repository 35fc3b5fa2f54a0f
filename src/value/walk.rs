use smallvec::SmallVec;

use crate::{expression::lexer::scan_variable_refs, value::model::ScriptValue};

/// Lazy pre-order traversal over a script value tree.
///
/// Yields a node before its operands, `valueA` before `valueB`. Absent
/// operands are skipped.
#[derive(Clone, Debug)]
pub struct Walk<'a> {
    stack: SmallVec<[&'a ScriptValue; 8]>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ScriptValue;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node {
            ScriptValue::Binary {
                value_a, value_b, ..
            } => {
                if let Some(b) = value_b.as_deref() {
                    self.stack.push(b);
                }
                if let Some(a) = value_a.as_deref() {
                    self.stack.push(a);
                }
            }
            ScriptValue::Unary { value, .. } => {
                if let Some(v) = value.as_deref() {
                    self.stack.push(v);
                }
            }
            ScriptValue::Number(_)
            | ScriptValue::Variable(_)
            | ScriptValue::Property { .. }
            | ScriptValue::Expression(_)
            | ScriptValue::True
            | ScriptValue::False => {}
        }
        Some(node)
    }
}

impl ScriptValue {
    /// Pre-order traversal starting at this node.
    pub fn walk(&self) -> Walk<'_> {
        walk_script_value(self)
    }
}

/// Pre-order traversal starting at `value`.
pub fn walk_script_value(value: &ScriptValue) -> Walk<'_> {
    let mut stack = SmallVec::new();
    stack.push(value);
    Walk { stack }
}

/// Return `true` as soon as `pred` matches a node; later nodes are not visited.
pub fn some_in_script_value(
    value: &ScriptValue,
    mut pred: impl FnMut(&ScriptValue) -> bool,
) -> bool {
    walk_script_value(value).any(|node| pred(node))
}

/// Return `true` when `id` is referenced by a `variable` node or from inside
/// the text of an `expression` node.
pub fn variable_in_script_value(id: &str, value: &ScriptValue) -> bool {
    some_in_script_value(value, |node| match node {
        ScriptValue::Variable(v) => v == id,
        ScriptValue::Expression(text) => scan_variable_refs(text).any(|v| v == id),
        ScriptValue::Number(_)
        | ScriptValue::Property { .. }
        | ScriptValue::True
        | ScriptValue::False
        | ScriptValue::Binary { .. }
        | ScriptValue::Unary { .. } => false,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/value/walk.rs"]
mod tests;
