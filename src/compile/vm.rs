use crate::{
    compile::instruction::{Instruction, Operator, PrecompiledScriptValue, PrecompiledValueFetch},
    foundation::error::{ScriptValueError, ScriptValueResult},
    optimise::fold::{fold_binary, fold_unary},
    value::model::UnaryOp,
};

/// Run a precompiled program on an integer stack.
///
/// Reference semantics for the stack program, sharing arithmetic with the
/// constant folder. Variables, fetched locals and random draws are supplied
/// by the caller.
pub fn eval_precompiled(
    program: &PrecompiledScriptValue,
    mut load_var: impl FnMut(&str) -> ScriptValueResult<i64>,
    mut load_local: impl FnMut(&PrecompiledValueFetch, u8) -> ScriptValueResult<i64>,
    mut rnd: impl FnMut(i64) -> i64,
) -> ScriptValueResult<i64> {
    let mut stack: Vec<i64> = Vec::with_capacity(16);

    for ins in &program.instructions {
        match ins {
            Instruction::Number(n) => stack.push(*n),
            Instruction::Variable(id) => stack.push(load_var(id)?),
            Instruction::Local { name, offset } => {
                let fetch = program
                    .fetches
                    .iter()
                    .find(|f| &f.local == name)
                    .ok_or_else(|| {
                        ScriptValueError::evaluation(format!("local '{name}' has no fetch"))
                    })?;
                stack.push(load_local(fetch, *offset)?);
            }
            Instruction::Op(Operator::Binary(op)) => {
                let b = pop(&mut stack)?;
                let a = pop(&mut stack)?;
                let v = fold_binary(*op, a, b).ok_or_else(|| {
                    ScriptValueError::evaluation(format!("'{}' by zero", op.tag()))
                })?;
                stack.push(v);
            }
            Instruction::Op(Operator::Unary(UnaryOp::Rnd)) => {
                let x = pop(&mut stack)?;
                stack.push(rnd(x));
            }
            Instruction::Op(Operator::Unary(op)) => {
                let x = pop(&mut stack)?;
                let v = fold_unary(*op, x).ok_or_else(|| {
                    ScriptValueError::evaluation(format!("'{}' has no static result", op.tag()))
                })?;
                stack.push(v);
            }
        }
    }

    if stack.len() != 1 {
        return Err(ScriptValueError::evaluation(format!(
            "stack has {} values at end of program",
            stack.len()
        )));
    }
    pop(&mut stack)
}

fn pop(stack: &mut Vec<i64>) -> ScriptValueResult<i64> {
    stack
        .pop()
        .ok_or_else(|| ScriptValueError::evaluation("stack underflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/vm.rs"]
mod tests;
