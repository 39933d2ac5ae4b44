//! Integer expressions with dice notation, as used in weapon and creature definitions.
//!
//! ```
//! let damage = dice_expr::parse("2d6 + max(str - 10, 0)").unwrap();
//! let value = damage.eval_with("str", 14).unwrap();
//! assert!((6..=16).contains(&value));
//! ```

mod common;
mod error;
pub mod eval;
pub mod parse;

pub use common::{BinaryOperator, Int};
pub use error::Error;
pub use eval::{EvalContext, EvalError, Environment, FunctionTable, Roller};
pub use parse::ast::{Evaluate, Expression};
pub use parse::ParseError;

/// Parses an expression for repeated evaluation.
pub fn parse(s: &str) -> Result<Expression, ParseError> {
    parse::parse(s)
}

/// Wraps a number in an [Expression] without parsing anything.
pub fn constant(value: Int) -> Expression {
    Expression::constant(value)
}

/// Parses and evaluates `s` with no variables bound.
pub fn evaluate(s: &str) -> Result<Int, Error> {
    evaluate_in(s, &())
}

/// Parses and evaluates `s` with `name` bound to `value`.
pub fn evaluate_with(s: &str, name: &str, value: Int) -> Result<Int, Error> {
    evaluate_in(s, &(name, value))
}

/// Parses and evaluates `s` against the bindings in `env`.
pub fn evaluate_in<E: Environment + ?Sized>(s: &str, env: &E) -> Result<Int, Error> {
    let expr = parse(s)?;
    expr.eval_in(env).map_err(|why| {
        log::debug!("evaluating {:?} failed: {}", s, why);
        why.into()
    })
}
