use crate::common::Int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unbound variable <{0}>")]
    UnboundVariable(String),
    #[error("no such function: {name}/{arity}")]
    NoSuchFunction { name: String, arity: usize },
    #[error("{function}: {reason}")]
    InvalidArgument {
        function: &'static str,
        reason: String,
    },
    #[error("cannot roll {multiplier}d{sides}")]
    InvalidDie { multiplier: Int, sides: Int },
    #[error("too many dice rolled")]
    TooManyRolls,
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("cannot take modulus by zero")]
    ZeroModulo,
    #[error("integer overflow")]
    Overflow,
}

impl EvalError {
    pub fn invalid_argument(function: &'static str, reason: impl ToString) -> Self {
        Self::InvalidArgument {
            function,
            reason: reason.to_string(),
        }
    }
}
