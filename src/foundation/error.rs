/// Convenience result type used across the crate.
pub type ScriptValueResult<T> = Result<T, ScriptValueError>;

/// Top-level error taxonomy for the fallible surfaces of the engine.
///
/// The core passes (optimise, walk, extract, precompile) never fail; these
/// errors only come out of strict parsing, JSON decoding and the reference
/// evaluator.
#[derive(thiserror::Error, Debug)]
pub enum ScriptValueError {
    /// Structurally invalid script value data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Syntax errors in legacy expression text.
    #[error("parse error: {0}")]
    Parse(String),

    /// Runtime failures while evaluating a precompiled program.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl ScriptValueError {
    /// Build a [`ScriptValueError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScriptValueError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`ScriptValueError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

impl From<serde_json::Error> for ScriptValueError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
