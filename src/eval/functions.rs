use super::error::EvalError;
use super::roller::Roller;
use crate::common::Int;
use std::fmt;
use std::sync::OnceLock;

/// A native function callable from expressions. Arguments arrive already evaluated.
pub type NativeFn = fn(&[Int], &mut dyn Roller) -> Result<Int, EvalError>;

#[derive(Copy, Clone)]
pub struct Function {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Functions keyed by name and arity.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: Vec<Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in functions, shared by every evaluation that does not supply its own table.
    pub fn builtin() -> &'static FunctionTable {
        static BUILTIN: OnceLock<FunctionTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            FunctionTable::new()
                .register("abs", 1, abs)
                .register("max", 2, max)
                .register("min", 2, min)
                .register("randint", 1, randint_below)
                .register("randint", 2, randint_between)
        })
    }

    /// Adds `name/arity`, replacing any function already registered under that key.
    pub fn register(mut self, name: &'static str, arity: usize, func: NativeFn) -> Self {
        let function = Function { name, arity, func };
        match self.functions.iter_mut().find(|f| f.name == name && f.arity == arity) {
            Some(existing) => *existing = function,
            None => self.functions.push(function),
        }
        self
    }

    pub fn find(&self, name: &str, arity: usize) -> Option<&Function> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.arity == arity)
    }
}

fn abs(args: &[Int], _: &mut dyn Roller) -> Result<Int, EvalError> {
    args[0].checked_abs().ok_or(EvalError::Overflow)
}

fn max(args: &[Int], _: &mut dyn Roller) -> Result<Int, EvalError> {
    Ok(args[0].max(args[1]))
}

fn min(args: &[Int], _: &mut dyn Roller) -> Result<Int, EvalError> {
    Ok(args[0].min(args[1]))
}

// Uniform in `[0, n)`.
fn randint_below(args: &[Int], roller: &mut dyn Roller) -> Result<Int, EvalError> {
    let n = args[0];
    if n <= 0 {
        return Err(EvalError::invalid_argument(
            "randint",
            format!("bound must be positive, got {}", n),
        ));
    }
    Ok(roller.between(0, n - 1))
}

// Uniform in `[low, high]`.
fn randint_between(args: &[Int], roller: &mut dyn Roller) -> Result<Int, EvalError> {
    let (low, high) = (args[0], args[1]);
    if high < low {
        return Err(EvalError::invalid_argument(
            "randint",
            format!("empty range [{}, {}]", low, high),
        ));
    }
    Ok(roller.between(low, high))
}
