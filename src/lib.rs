//! Script value expression engine.
//!
//! A script value is a small typed expression tree used by visual scripting
//! for conditions, assignments and event arguments. This crate owns the tree
//! and the passes over it:
//!
//! 1. **Model**: [`ScriptValue`], with the project-file JSON shape via Serde
//! 2. **Walk**: pre-order traversal and existential queries ([`walk_script_value`])
//! 3. **Optimise**: constant folding and legacy expression conversion
//!    ([`optimise_script_value`])
//! 4. **Parse**: legacy `$V0$ + 1` style text to trees ([`parse_expression`])
//! 5. **Extract**: referenced variable ids ([`extract_script_value_variables`])
//! 6. **Precompile**: postfix stack program plus ordered fetch list
//!    ([`precompile_script_value`])
//!
//! All passes are pure and total: they return new trees and degrade malformed
//! input to `number:0` instead of failing.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod analysis;
mod compile;
mod expression;
mod foundation;
mod optimise;
mod value;

pub use analysis::variables::extract_script_value_variables;
pub use compile::instruction::{
    Instruction, Operator, PrecompiledScriptValue, PrecompiledValueFetch, ValueFetch,
};
pub use compile::precompile::{
    PrecompileOpts, precompile_script_value, precompile_script_value_with, sort_fetch_operations,
};
pub use compile::vm::eval_precompiled;
pub use expression::parser::{parse_expression, try_parse_expression};
pub use foundation::error::{ScriptValueError, ScriptValueResult};
pub use optimise::fold::optimise_script_value;
pub use value::model::{
    ActorProperty, BinaryOp, ScriptValue, UnaryOp, add_script_value_const,
    add_script_value_to_script_value, multiply_script_value_const,
};
pub use value::walk::{Walk, some_in_script_value, variable_in_script_value, walk_script_value};
pub use value::wire::is_script_value;
