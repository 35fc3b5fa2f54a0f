use serde::ser::SerializeMap as _;

use crate::value::model::{BinaryOp, UnaryOp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Operator step of a precompiled program.
pub enum Operator {
    /// Pops two values (`b` on top), pushes the result.
    Binary(BinaryOp),
    /// Pops one value, pushes the result.
    Unary(UnaryOp),
}

impl Operator {
    /// Tag shared with the corresponding script value kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Binary(op) => op.tag(),
            Self::Unary(op) => op.tag(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One step of a postfix stack program.
pub enum Instruction {
    /// Push the value of a script variable.
    Variable(String),
    /// Push slot `offset` of a fetched local.
    Local {
        /// Local name, as listed in [`PrecompiledScriptValue::fetches`].
        name: String,
        /// Slot within the fetched record.
        offset: u8,
    },
    /// Push an integer constant.
    Number(i64),
    /// Apply an operator to the top of the stack.
    Op(Operator),
}

impl serde::Serialize for Instruction {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Instruction::Variable(id) => {
                let mut m = s.serialize_map(Some(2))?;
                m.serialize_entry("type", "variable")?;
                m.serialize_entry("value", id)?;
                m.end()
            }
            Instruction::Local { name, offset } => {
                let mut m = s.serialize_map(Some(3))?;
                m.serialize_entry("type", "local")?;
                m.serialize_entry("value", name)?;
                m.serialize_entry("offset", offset)?;
                m.end()
            }
            Instruction::Number(n) => {
                let mut m = s.serialize_map(Some(2))?;
                m.serialize_entry("type", "number")?;
                m.serialize_entry("value", n)?;
                m.end()
            }
            Instruction::Op(op) => {
                let mut m = s.serialize_map(Some(1))?;
                m.serialize_entry("type", op.tag())?;
                m.end()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// A side-effecting runtime read materialised into a local before the stack
/// program runs.
pub enum ValueFetch {
    /// Actor position record: slot 1 is x, slot 2 is y (subpixel units).
    ActorPosition {
        /// Actor identifier.
        target: String,
    },
    /// Actor facing direction in slot 0.
    ActorDirection {
        /// Actor identifier.
        target: String,
    },
    /// Actor animation frame in slot 0.
    ActorFrame {
        /// Actor identifier.
        target: String,
    },
}

impl ValueFetch {
    /// Actor the fetch reads from.
    pub fn target(&self) -> &str {
        match self {
            Self::ActorPosition { target }
            | Self::ActorDirection { target }
            | Self::ActorFrame { target } => target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A fetch bound to the local that receives its result.
pub struct PrecompiledValueFetch {
    /// Generated local name referenced by [`Instruction::Local`].
    pub local: String,
    /// What to read.
    pub value: ValueFetch,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Output of precompilation: fetches to issue first, then the postfix program.
///
/// Serializes as the pair `[instructions, fetches]` consumed by code generation.
pub struct PrecompiledScriptValue {
    /// Postfix stack program; order is significant.
    pub instructions: Vec<Instruction>,
    /// Fetches in first-seen order.
    pub fetches: Vec<PrecompiledValueFetch>,
}

impl serde::Serialize for PrecompiledScriptValue {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&(&self.instructions, &self.fetches), s)
    }
}
