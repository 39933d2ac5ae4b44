mod ctx;
mod env;
mod error;
mod functions;
mod roller;

use crate::common::*;
use crate::parse::ast::*;

type EResult<T> = Result<T, EvalError>;

pub use ctx::EvalContext;
pub use env::Environment;
pub use error::EvalError;
pub use functions::{Function, FunctionTable, NativeFn};
pub use roller::Roller;

impl Expression {
    /// Evaluates with no variables bound.
    pub fn eval(&self) -> EResult<Int> {
        self.eval_in(&())
    }

    /// Evaluates with a single variable bound.
    pub fn eval_with(&self, name: &str, value: Int) -> EResult<Int> {
        self.eval_in(&(name, value))
    }

    /// Evaluates against `env`, rolling dice on the thread-local generator.
    pub fn eval_in<E: Environment + ?Sized>(&self, env: &E) -> EResult<Int> {
        let mut rng = rand::thread_rng();
        let mut ctx = EvalContext::new_unbounded(&env, &mut rng);
        self.evaluate(&mut ctx)
    }
}

impl Evaluate for Constant {
    fn evaluate(&self, _ctx: &mut EvalContext<'_>) -> EResult<Int> {
        Ok(self.0)
    }
}

impl Evaluate for Variable {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> EResult<Int> {
        ctx.lookup(&self.0)
    }
}

impl Evaluate for Binary {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> EResult<Int> {
        let lhs = self.lhs.evaluate(ctx)?;
        let rhs = self.rhs.evaluate(ctx)?;

        use BinaryOperator::*;
        let result = match self.op {
            Add => lhs.checked_add(rhs),
            Sub => lhs.checked_sub(rhs),
            Mul => lhs.checked_mul(rhs),
            Div if rhs == 0 => return Err(EvalError::ZeroDivision),
            Div => lhs.checked_div(rhs),
            Rem if rhs == 0 => return Err(EvalError::ZeroModulo),
            Rem => lhs.checked_rem(rhs),
        };
        result.ok_or(EvalError::Overflow)
    }
}

impl Evaluate for Die {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> EResult<Int> {
        let invalid = || EvalError::InvalidDie {
            multiplier: self.multiplier,
            sides: self.sides,
        };
        let num = usize::try_from(self.multiplier).map_err(|_| invalid())?;
        let sides = UInt::try_from(self.sides)
            .ok()
            .and_then(NonZeroUInt::new)
            .ok_or_else(invalid)?;

        let total = ctx.roll_sum(num, sides)?;
        log::trace!("rolled {} = {}", self, total);
        Ok(total)
    }
}

impl Evaluate for Apply {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> EResult<Int> {
        let function = ctx
            .functions()
            .find(&self.function, self.args.len())
            .ok_or_else(|| EvalError::NoSuchFunction {
                name: self.function.clone(),
                arity: self.args.len(),
            })?;

        let args = self
            .args
            .iter()
            .map(|arg| arg.evaluate(ctx))
            .collect::<EResult<Vec<_>>>()?;
        (function.func)(&args, ctx.roller())
    }
}

#[cfg(test)]
mod tests {
    use super::roller::StepRoller;
    use super::*;
    use std::collections::HashMap;

    fn mock_roller() -> StepRoller {
        StepRoller::new(NonZeroUInt::new(1).unwrap(), 1)
    }

    fn eval_env(s: &str, env: &dyn Environment) -> EResult<Int> {
        let mut roller = mock_roller();
        let mut ctx = EvalContext::new_bounded(1000, env, &mut roller);
        crate::parse::parse(s).unwrap().evaluate(&mut ctx)
    }

    fn check(s: &str, expected: Int) {
        assert_eq!(eval_env(s, &()), Ok(expected), "{}", s);
    }

    fn check_err(s: &str, expected: EvalError) {
        assert_eq!(eval_env(s, &()), Err(expected), "{}", s);
    }

    #[test]
    fn test_eval_number() {
        check("0", 0);
        check("5", 5);
        check("-5", -5);
        check("+5", 5);
    }

    #[test]
    fn test_eval_binary() {
        check("2 + 2", 4);
        check("5 - 2 - 1", 2);
        check("1 + 2 * 3 + 4", 11);
        check("(1 + 2) * (3 + 4)", 21);
        check("7 / 2", 3);
        check("-7 / 2", -3);
        check("-7 % 3", -1);
        check("7 % -3", 1);
    }

    #[test]
    fn test_eval_dice() {
        check("d1 + d1", 2);
        check("3d1 + 1", 4);
        check("0d6", 0);
        check("1d20 + 4", 1 + 4);
        check("3d6", 1 + 2 + 3);
        check("2d4 * 10 + d6", (1 + 2) * 10 + 3);
    }

    #[test]
    fn test_eval_dice_not_memoized() {
        let mut roller = mock_roller();
        let mut ctx = EvalContext::new_unbounded(&(), &mut roller);
        let expr = crate::parse::parse("d100").unwrap();
        assert_eq!(expr.evaluate(&mut ctx), Ok(1));
        assert_eq!(expr.evaluate(&mut ctx), Ok(2));
        assert_eq!(expr.evaluate(&mut ctx), Ok(3));
    }

    #[test]
    fn test_eval_invalid_dice() {
        check_err("3d0", EvalError::InvalidDie { multiplier: 3, sides: 0 });
        assert_eq!(
            Expression::die(-1, 6).evaluate(&mut EvalContext::new_unbounded(&(), &mut mock_roller())),
            Err(EvalError::InvalidDie { multiplier: -1, sides: 6 })
        );
        assert_eq!(
            Expression::die(1, -6).evaluate(&mut EvalContext::new_unbounded(&(), &mut mock_roller())),
            Err(EvalError::InvalidDie { multiplier: 1, sides: -6 })
        );
    }

    #[test]
    fn test_eval_functions() {
        check("max(1, 2)", 2);
        check("min(1, 2)", 1);
        check("abs(-3) + abs(3)", 6);
        check("randint(5, 5)", 5);
        check("randint(1)", 0);
        check("randint(10, 12)", 10);
    }

    #[test]
    fn test_eval_arguments_left_to_right() {
        // Each die consumes the next step, so the order of the arguments is observable.
        check("max(d100, d100)", 2);
        check("min(d100, d100)", 1);
        check("d100 - d100", 1 - 2);
    }

    #[test]
    fn test_no_such_function() {
        let err = eval_env("nosuch(1)", &()).unwrap_err();
        assert_eq!(
            err,
            EvalError::NoSuchFunction {
                name: "nosuch".to_string(),
                arity: 1
            }
        );
        assert_eq!(err.to_string(), "no such function: nosuch/1");
        check_err(
            "max(1)",
            EvalError::NoSuchFunction {
                name: "max".to_string(),
                arity: 1,
            },
        );
    }

    #[test]
    fn test_unknown_function_checked_before_arguments() {
        check_err(
            "nosuch(x)",
            EvalError::NoSuchFunction {
                name: "nosuch".to_string(),
                arity: 1,
            },
        );
    }

    #[test]
    fn test_variables() {
        let env: HashMap<String, Int> = [("one".to_string(), 1), ("two".to_string(), 2)]
            .into_iter()
            .collect();
        assert_eq!(eval_env("one + two", &env), Ok(3));
        assert_eq!(
            eval_env("one + three", &env),
            Err(EvalError::UnboundVariable("three".to_string()))
        );
        assert_eq!(
            eval_env("level * 2", &()).unwrap_err().to_string(),
            "unbound variable <level>"
        );
    }

    #[test]
    fn test_arithmetic_faults() {
        check_err("1 / 0", EvalError::ZeroDivision);
        check_err("1 % 0", EvalError::ZeroModulo);
        check_err("1 / (d1 - 1)", EvalError::ZeroDivision);
        check_err("2147483647 + 1", EvalError::Overflow);
        check_err("-2147483647 - 2", EvalError::Overflow);
        check_err("65536 * 65536", EvalError::Overflow);
        check_err("(-2147483647 - 1) / -1", EvalError::Overflow);
    }

    #[test]
    fn test_too_many_rolls() {
        check_err("1001d6", EvalError::TooManyRolls);
        check_err("600d6 + 600d6", EvalError::TooManyRolls);
        check("1000d1", 1000);
    }

    #[test]
    fn test_custom_functions() {
        fn double(args: &[Int], _: &mut dyn Roller) -> EResult<Int> {
            args[0].checked_mul(2).ok_or(EvalError::Overflow)
        }
        let table = FunctionTable::new().register("double", 1, double);
        let mut roller = mock_roller();
        let mut ctx = EvalContext::new_unbounded(&(), &mut roller).with_functions(&table);
        let expr = crate::parse::parse("double(21)").unwrap();
        assert_eq!(expr.evaluate(&mut ctx), Ok(42));

        let expr = crate::parse::parse("max(1, 2)").unwrap();
        assert!(matches!(
            expr.evaluate(&mut ctx),
            Err(EvalError::NoSuchFunction { .. })
        ));
    }

    #[test]
    fn test_reevaluation_is_stable() {
        let expr = crate::parse::parse("(a + 3) * b - max(a, b)").unwrap();
        let env = [("a", 2), ("b", 5)];
        let first = expr.eval_in(&env[..]).unwrap();
        for _ in 0..10 {
            assert_eq!(expr.eval_in(&env[..]), Ok(first));
        }
        assert_eq!(first, 20);
    }

    #[test]
    fn test_eval_helpers() {
        let expr = crate::parse::parse("x * 2").unwrap();
        assert_eq!(expr.eval_with("x", 21), Ok(42));
        assert_eq!(
            expr.eval(),
            Err(EvalError::UnboundVariable("x".to_string()))
        );
        let d = Expression::die(1, 4).eval().unwrap();
        assert!((1..=4).contains(&d));
    }
}
