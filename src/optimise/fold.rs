use std::f64::consts::PI;

use crate::{
    expression::parser::parse_expression,
    value::model::{BinaryOp, ScriptValue, UnaryOp},
};

/// Simplify a script value to its minimal equivalent form.
///
/// Children are optimised first; operator nodes whose operands are all
/// constants are replaced by their result. Absent operands become
/// `number:0`, legacy `expression` nodes are parsed into tree form, and `rnd`
/// nodes are kept so the random draw still happens at runtime.
///
/// The input is left untouched and `optimise(optimise(x)) == optimise(x)`.
#[tracing::instrument(level = "trace", skip_all)]
pub fn optimise_script_value(value: &ScriptValue) -> ScriptValue {
    optimise(value)
}

fn optimise(value: &ScriptValue) -> ScriptValue {
    match value {
        ScriptValue::Number(_)
        | ScriptValue::Variable(_)
        | ScriptValue::Property { .. }
        | ScriptValue::True
        | ScriptValue::False => value.clone(),
        ScriptValue::Expression(text) => optimise(&parse_expression(text)),
        ScriptValue::Binary {
            op,
            value_a,
            value_b,
        } => {
            let a = optimise_operand(value_a.as_deref());
            let b = optimise_operand(value_b.as_deref());
            if let (Some(x), Some(y)) = (a.const_value(), b.const_value()) {
                if let Some(n) = fold_binary(*op, x, y) {
                    return ScriptValue::Number(n);
                }
                tracing::trace!(op = op.tag(), x, y, "constant operands left unfolded");
            }
            ScriptValue::binary(*op, a, b)
        }
        ScriptValue::Unary { op, value } => {
            let v = optimise_operand(value.as_deref());
            if let Some(x) = v.const_value()
                && let Some(n) = fold_unary(*op, x)
            {
                return ScriptValue::Number(n);
            }
            ScriptValue::unary(*op, v)
        }
    }
}

fn optimise_operand(value: Option<&ScriptValue>) -> ScriptValue {
    match value {
        Some(v) => optimise(v),
        None => ScriptValue::Number(0),
    }
}

/// Compile-time result of a binary operator, or `None` when the operation has
/// to stay a runtime operation (division or modulo by zero).
pub(crate) fn fold_binary(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    let v = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        BinaryOp::Gt => i64::from(a > b),
        BinaryOp::Gte => i64::from(a >= b),
        BinaryOp::Lt => i64::from(a < b),
        BinaryOp::Lte => i64::from(a <= b),
        BinaryOp::Eq => i64::from(a == b),
        BinaryOp::Ne => i64::from(a != b),
        BinaryOp::Min => a.min(b),
        BinaryOp::Max => a.max(b),
        BinaryOp::And => i64::from(a != 0 && b != 0),
        BinaryOp::Or => i64::from(a != 0 || b != 0),
        // Bitwise kinds work on the 32-bit two's complement view.
        BinaryOp::Shl => i64::from((a as i32).wrapping_shl(b as u32)),
        BinaryOp::Shr => i64::from((a as i32).wrapping_shr(b as u32)),
        BinaryOp::BAnd => i64::from((a as i32) & (b as i32)),
        BinaryOp::BOr => i64::from((a as i32) | (b as i32)),
        BinaryOp::BXor => i64::from((a as i32) ^ (b as i32)),
        BinaryOp::Atan2 => atan2_angle(a, b),
    };
    Some(v)
}

/// Compile-time result of a unary operator. `rnd` never folds.
pub(crate) fn fold_unary(op: UnaryOp, x: i64) -> Option<i64> {
    let v = match op {
        UnaryOp::Not => i64::from(x == 0),
        UnaryOp::Abs => x.wrapping_abs(),
        UnaryOp::Isqrt => isqrt(x),
        UnaryOp::BNot => i64::from(!(x as i32)),
        UnaryOp::Rnd => return None,
    };
    Some(v)
}

/// Angle of the vector (x = `b`, y = `a`) in 1/256 turns, 0 pointing up and
/// 64 pointing right. `atan2(8, 10) == 91`.
fn atan2_angle(a: i64, b: i64) -> i64 {
    let turns = (a as f64).atan2(b as f64) * 128.0 / PI + 64.0;
    (turns.round() as i64).rem_euclid(256)
}

fn isqrt(x: i64) -> i64 {
    if x <= 0 {
        return 0;
    }
    let mut r = (x as f64).sqrt() as i64;
    while r.checked_mul(r).is_none_or(|sq| sq > x) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= x) {
        r += 1;
    }
    r
}

#[cfg(test)]
#[path = "../../tests/unit/optimise/fold.rs"]
mod tests;
