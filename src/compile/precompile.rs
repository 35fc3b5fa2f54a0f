use std::collections::HashMap;

use crate::{
    compile::instruction::{
        Instruction, Operator, PrecompiledScriptValue, PrecompiledValueFetch, ValueFetch,
    },
    expression::parser::parse_expression,
    value::model::{ActorProperty, BinaryOp, ScriptValue},
};

/// Options for [`precompile_script_value_with`].
#[derive(Debug, Clone)]
pub struct PrecompileOpts {
    pub(crate) local_prefix: String,
}

impl Default for PrecompileOpts {
    fn default() -> Self {
        Self {
            local_prefix: "local_".to_owned(),
        }
    }
}

impl PrecompileOpts {
    /// Return options generating fetch locals named `<prefix>0`, `<prefix>1`, ...
    pub fn with_local_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.local_prefix = prefix.into();
        self
    }
}

/// How a property node is read back from its fetched record.
struct PropertyRead {
    offset: u8,
    /// Right shift applied after the push, converting subpixels.
    shift: Option<i64>,
}

fn property_fetch(target: &str, property: ActorProperty) -> (ValueFetch, PropertyRead) {
    let target = target.to_owned();
    match property {
        ActorProperty::Xpos => (
            ValueFetch::ActorPosition { target },
            PropertyRead {
                offset: 1,
                shift: Some(7),
            },
        ),
        ActorProperty::Ypos => (
            ValueFetch::ActorPosition { target },
            PropertyRead {
                offset: 2,
                shift: Some(7),
            },
        ),
        ActorProperty::Pxpos => (
            ValueFetch::ActorPosition { target },
            PropertyRead {
                offset: 1,
                shift: Some(4),
            },
        ),
        ActorProperty::Pypos => (
            ValueFetch::ActorPosition { target },
            PropertyRead {
                offset: 2,
                shift: Some(4),
            },
        ),
        ActorProperty::Direction => (
            ValueFetch::ActorDirection { target },
            PropertyRead {
                offset: 0,
                shift: None,
            },
        ),
        ActorProperty::Frame => (
            ValueFetch::ActorFrame { target },
            PropertyRead {
                offset: 0,
                shift: None,
            },
        ),
    }
}

struct PrecompileCtx<'o> {
    opts: &'o PrecompileOpts,
    next_local: usize,
    out: PrecompiledScriptValue,
}

impl PrecompileCtx<'_> {
    fn alloc_local(&mut self) -> String {
        let name = format!("{}{}", self.opts.local_prefix, self.next_local);
        self.next_local += 1;
        name
    }

    fn emit(&mut self, ins: Instruction) {
        self.out.instructions.push(ins);
    }

    fn lower(&mut self, value: &ScriptValue) {
        match value {
            ScriptValue::Number(n) => self.emit(Instruction::Number(*n)),
            ScriptValue::True => self.emit(Instruction::Number(1)),
            ScriptValue::False => self.emit(Instruction::Number(0)),
            ScriptValue::Variable(id) => self.emit(Instruction::Variable(id.clone())),
            ScriptValue::Property { target, property } => self.lower_property(target, *property),
            ScriptValue::Expression(text) => {
                let parsed = parse_expression(text);
                self.lower(&parsed);
            }
            ScriptValue::Binary {
                op,
                value_a,
                value_b,
            } => {
                self.lower_operand(value_a.as_deref());
                self.lower_operand(value_b.as_deref());
                self.emit(Instruction::Op(Operator::Binary(*op)));
            }
            ScriptValue::Unary { op, value } => {
                self.lower_operand(value.as_deref());
                self.emit(Instruction::Op(Operator::Unary(*op)));
            }
        }
    }

    fn lower_operand(&mut self, value: Option<&ScriptValue>) {
        match value {
            Some(v) => self.lower(v),
            None => self.emit(Instruction::Number(0)),
        }
    }

    fn lower_property(&mut self, target: &str, property: ActorProperty) {
        let (fetch, read) = property_fetch(target, property);
        let local = self.alloc_local();
        self.out.fetches.push(PrecompiledValueFetch {
            local: local.clone(),
            value: fetch,
        });
        self.emit(Instruction::Local {
            name: local,
            offset: read.offset,
        });
        if let Some(shift) = read.shift {
            self.emit(Instruction::Number(shift));
            self.emit(Instruction::Op(Operator::Binary(BinaryOp::Shr)));
        }
    }
}

/// Lower a script value into a postfix stack program plus the fetches that
/// must run before it, using default options.
pub fn precompile_script_value(value: &ScriptValue) -> PrecompiledScriptValue {
    precompile_script_value_with(value, &PrecompileOpts::default())
}

/// Lower a script value into a postfix stack program plus the fetches that
/// must run before it.
///
/// Operands are emitted before their operator (`valueA` first). Every
/// `property` leaf allocates a fresh local in first-seen order.
#[tracing::instrument(level = "debug", skip_all)]
pub fn precompile_script_value_with(
    value: &ScriptValue,
    opts: &PrecompileOpts,
) -> PrecompiledScriptValue {
    let mut ctx = PrecompileCtx {
        opts,
        next_local: 0,
        out: PrecompiledScriptValue::default(),
    };
    ctx.lower(value);
    tracing::debug!(
        instructions = ctx.out.instructions.len(),
        fetches = ctx.out.fetches.len(),
        "precompiled script value"
    );
    ctx.out
}

/// Group fetches on the same target next to each other.
///
/// Stable: groups appear in order of their first member, and members keep
/// their relative order. Fetch kind does not split a group.
pub fn sort_fetch_operations(fetches: Vec<PrecompiledValueFetch>) -> Vec<PrecompiledValueFetch> {
    let mut group_of: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<PrecompiledValueFetch>> = Vec::new();
    for f in fetches {
        let idx = *group_of
            .entry(f.value.target().to_owned())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[idx].push(f);
    }
    groups.into_iter().flatten().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/precompile.rs"]
mod tests;
