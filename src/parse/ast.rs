use crate::common::*;
use crate::eval::{EvalContext, EvalError};
use std::fmt;
use std::ops::{Add, Mul};

#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Int, EvalError>;
}

/// A parsed expression. Trees are immutable once built and may be evaluated any number of times.
#[enum_dispatch::enum_dispatch(Evaluate)]
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Expression {
    Constant(Constant),
    Variable(Variable),
    Binary(Binary),
    Die(Die),
    Apply(Apply),
}

impl Expression {
    pub fn constant(value: Int) -> Self {
        Self::Constant(Constant(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable(name.into()))
    }

    pub fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary(Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// `multiplier` rolls of a die with `sides` faces, summed.
    pub fn die(multiplier: Int, sides: Int) -> Self {
        Self::Die(Die { multiplier, sides })
    }

    pub fn apply(function: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::Apply(Apply {
            function: function.into(),
            args,
        })
    }
}

impl Add<Int> for Expression {
    type Output = Expression;

    fn add(self, rhs: Int) -> Self::Output {
        Expression::binary(BinaryOperator::Add, self, Expression::constant(rhs))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(x) => fmt::Display::fmt(x, f),
            Self::Variable(x) => fmt::Display::fmt(x, f),
            Self::Binary(x) => fmt::Display::fmt(x, f),
            Self::Die(x) => fmt::Display::fmt(x, f),
            Self::Apply(x) => fmt::Display::fmt(x, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Constant(pub Int);

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Variable(pub String);

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Binary {
    pub op: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op, self.rhs)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Die {
    pub multiplier: Int,
    pub sides: Int,
}

pub const D2: Die = Die::single(2);
pub const D3: Die = Die::single(3);
pub const D4: Die = Die::single(4);
pub const D5: Die = Die::single(5);
pub const D6: Die = Die::single(6);
pub const D7: Die = Die::single(7);
pub const D8: Die = Die::single(8);
pub const D9: Die = Die::single(9);
pub const D12: Die = Die::single(12);

impl Die {
    pub const fn single(sides: Int) -> Self {
        Self { multiplier: 1, sides }
    }
}

impl Add<Int> for Die {
    type Output = Expression;

    fn add(self, rhs: Int) -> Self::Output {
        Expression::Die(self) + rhs
    }
}

/// `3 * D6` rolls three six-sided dice.
impl Mul<Die> for Int {
    type Output = Expression;

    fn mul(self, rhs: Die) -> Self::Output {
        Expression::die(self, rhs.sides)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.multiplier, self.sides)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Apply {
    pub function: String,
    pub args: Vec<Expression>,
}

impl fmt::Display for Apply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}
