use crate::value::wire::RawScriptValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Two-operand script value kinds.
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`, truncating toward zero.
    Div,
    /// `a % b`, sign follows the dividend.
    Mod,
    /// `a > b` as 1/0.
    Gt,
    /// `a >= b` as 1/0.
    Gte,
    /// `a < b` as 1/0.
    Lt,
    /// `a <= b` as 1/0.
    Lte,
    /// `a == b` as 1/0.
    Eq,
    /// `a != b` as 1/0.
    Ne,
    /// Smaller of both operands.
    Min,
    /// Larger of both operands.
    Max,
    /// Logical and on truthiness.
    And,
    /// Logical or on truthiness.
    Or,
    /// Shift left.
    Shl,
    /// Arithmetic shift right.
    Shr,
    /// Bitwise and.
    BAnd,
    /// Bitwise or.
    BOr,
    /// Bitwise exclusive or.
    BXor,
    /// Angle from `a` (y) and `b` (x) in 256-step fixed-point units.
    Atan2,
}

impl BinaryOp {
    /// Every binary kind, in tag order.
    pub const ALL: [BinaryOp; 21] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Eq,
        Self::Ne,
        Self::Min,
        Self::Max,
        Self::And,
        Self::Or,
        Self::Shl,
        Self::Shr,
        Self::BAnd,
        Self::BOr,
        Self::BXor,
        Self::Atan2,
    ];

    /// The `type` tag used in project files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Min => "min",
            Self::Max => "max",
            Self::And => "and",
            Self::Or => "or",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::BAnd => "bAND",
            Self::BOr => "bOR",
            Self::BXor => "bXOR",
            Self::Atan2 => "atan2",
        }
    }

    /// Inverse of [`BinaryOp::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Single-operand script value kinds.
pub enum UnaryOp {
    /// Logical not: 0 becomes 1, anything else 0.
    Not,
    /// Absolute value.
    Abs,
    /// Integer square root (floor).
    Isqrt,
    /// Bitwise complement.
    BNot,
    /// Random number below the operand. Always evaluated at runtime.
    Rnd,
}

impl UnaryOp {
    /// Every unary kind, in tag order.
    pub const ALL: [UnaryOp; 5] = [Self::Not, Self::Abs, Self::Isqrt, Self::BNot, Self::Rnd];

    /// The `type` tag used in project files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Abs => "abs",
            Self::Isqrt => "isqrt",
            Self::BNot => "bNOT",
            Self::Rnd => "rnd",
        }
    }

    /// Inverse of [`UnaryOp::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Live actor attributes readable through a `property` node.
pub enum ActorProperty {
    /// Horizontal position in tiles.
    Xpos,
    /// Vertical position in tiles.
    Ypos,
    /// Horizontal position in pixels.
    Pxpos,
    /// Vertical position in pixels.
    Pypos,
    /// Facing direction.
    Direction,
    /// Current animation frame.
    Frame,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawScriptValue", into = "RawScriptValue")]
/// A node of the script value expression tree.
///
/// Trees are strictly owned: no sharing, no cycles. Operands are optional so a
/// partially edited node can be represented; every pass treats an absent
/// operand as `number:0`.
pub enum ScriptValue {
    /// Integer literal.
    Number(i64),
    /// Variable reference: global (`"0"`, `"V0"`), local (`"L0"`) or temporary (`"T0"`).
    Variable(String),
    /// Runtime attribute of a named actor.
    Property {
        /// Actor identifier (`"player"` or an actor id).
        target: String,
        /// Attribute to read.
        property: ActorProperty,
    },
    /// Legacy textual expression, converted to tree form by the optimiser.
    Expression(String),
    /// Boolean true atom.
    True,
    /// Boolean false atom.
    False,
    /// Binary operator node.
    Binary {
        /// Operator kind.
        op: BinaryOp,
        /// Left operand.
        value_a: Option<Box<ScriptValue>>,
        /// Right operand.
        value_b: Option<Box<ScriptValue>>,
    },
    /// Unary operator node.
    Unary {
        /// Operator kind.
        op: UnaryOp,
        /// Operand.
        value: Option<Box<ScriptValue>>,
    },
}

impl ScriptValue {
    /// Integer literal node.
    pub fn number(value: i64) -> Self {
        Self::Number(value)
    }

    /// Variable reference node.
    pub fn variable(id: impl Into<String>) -> Self {
        Self::Variable(id.into())
    }

    /// Actor property node.
    pub fn property(target: impl Into<String>, property: ActorProperty) -> Self {
        Self::Property {
            target: target.into(),
            property,
        }
    }

    /// Legacy expression node.
    pub fn expression(text: impl Into<String>) -> Self {
        Self::Expression(text.into())
    }

    /// Binary node with both operands present.
    pub fn binary(op: BinaryOp, a: ScriptValue, b: ScriptValue) -> Self {
        Self::Binary {
            op,
            value_a: Some(Box::new(a)),
            value_b: Some(Box::new(b)),
        }
    }

    /// Unary node with its operand present.
    pub fn unary(op: UnaryOp, value: ScriptValue) -> Self {
        Self::Unary {
            op,
            value: Some(Box::new(value)),
        }
    }

    /// The `type` tag used in project files.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Variable(_) => "variable",
            Self::Property { .. } => "property",
            Self::Expression(_) => "expression",
            Self::True => "true",
            Self::False => "false",
            Self::Binary { op, .. } => op.tag(),
            Self::Unary { op, .. } => op.tag(),
        }
    }

    /// Compile-time constant carried by this node, if it is a literal.
    ///
    /// `true`/`false` count as 1/0.
    pub fn const_value(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::True => Some(1),
            Self::False => Some(0),
            Self::Variable(_)
            | Self::Property { .. }
            | Self::Expression(_)
            | Self::Binary { .. }
            | Self::Unary { .. } => None,
        }
    }

    /// Parse a script value from its JSON project-file form.
    pub fn from_json_str(s: &str) -> crate::ScriptValueResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// `a + b` without folding.
pub fn add_script_value_to_script_value(a: ScriptValue, b: ScriptValue) -> ScriptValue {
    ScriptValue::binary(BinaryOp::Add, a, b)
}

/// `a + n` without folding.
pub fn add_script_value_const(a: ScriptValue, n: i64) -> ScriptValue {
    ScriptValue::binary(BinaryOp::Add, a, ScriptValue::Number(n))
}

/// `a * n` without folding.
pub fn multiply_script_value_const(a: ScriptValue, n: i64) -> ScriptValue {
    ScriptValue::binary(BinaryOp::Mul, a, ScriptValue::Number(n))
}

#[cfg(test)]
#[path = "../../tests/unit/value/model.rs"]
mod tests;
