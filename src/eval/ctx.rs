use super::{env::Environment, error::EvalError, functions::FunctionTable, roller::Roller};
use crate::common::*;

/// Everything an expression needs while it is being evaluated.
pub struct EvalContext<'a> {
    env: &'a dyn Environment,
    roller: &'a mut dyn Roller,
    functions: &'a FunctionTable,
    max_rolls: Option<usize>,
    rolls: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(max_rolls: Option<usize>, env: &'a dyn Environment, roller: &'a mut dyn Roller) -> Self {
        Self {
            env,
            roller,
            functions: FunctionTable::builtin(),
            max_rolls,
            rolls: 0,
        }
    }

    pub fn new_bounded(max_rolls: usize, env: &'a dyn Environment, roller: &'a mut dyn Roller) -> Self {
        Self::new(Some(max_rolls), env, roller)
    }

    pub fn new_unbounded(env: &'a dyn Environment, roller: &'a mut dyn Roller) -> Self {
        Self::new(None, env, roller)
    }

    pub fn with_functions(mut self, functions: &'a FunctionTable) -> Self {
        self.functions = functions;
        self
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<Int, EvalError> {
        self.env
            .lookup(name)
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
    }

    pub(crate) fn functions(&self) -> &'a FunctionTable {
        self.functions
    }

    pub(crate) fn roller(&mut self) -> &mut dyn Roller {
        &mut *self.roller
    }

    fn count_rolls(&mut self, n: usize) -> Result<(), EvalError> {
        self.rolls = self.rolls.saturating_add(n);
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            Err(EvalError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    /// Sum of `num` rolls of a die with `sides` faces.
    pub(crate) fn roll_sum(&mut self, num: usize, sides: NonZeroUInt) -> Result<Int, EvalError> {
        self.count_rolls(num)?;
        let mut total: Int = 0;
        for _ in 0..num {
            let value = Int::try_from(self.roller.roll(sides)).map_err(|_| EvalError::Overflow)?;
            total = total.checked_add(value).ok_or(EvalError::Overflow)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::roller::StepRoller;

    fn mock_roller() -> StepRoller {
        StepRoller::new(NonZeroUInt::new(1).unwrap(), 1)
    }

    fn sides(x: UInt) -> NonZeroUInt {
        NonZeroUInt::new(x).unwrap()
    }

    #[test]
    fn test_roll_sum() {
        let mut roller = mock_roller();
        let mut ctx = EvalContext::new_unbounded(&(), &mut roller);
        assert_eq!(ctx.roll_sum(3, sides(6)), Ok(1 + 2 + 3));
        assert_eq!(ctx.roll_sum(0, sides(6)), Ok(0));
        assert_eq!(ctx.rolls, 3);
    }

    #[test]
    fn test_too_many_rolls() {
        let mut roller = mock_roller();
        let mut ctx = EvalContext::new_bounded(5, &(), &mut roller);
        assert!(ctx.roll_sum(5, sides(4)).is_ok());
        assert_eq!(ctx.roll_sum(1, sides(4)), Err(EvalError::TooManyRolls));
    }

    #[test]
    fn test_lookup() {
        let mut roller = mock_roller();
        let env = ("x", 4);
        let ctx = EvalContext::new_unbounded(&env, &mut roller);
        assert_eq!(ctx.lookup("x"), Ok(4));
        assert_eq!(ctx.lookup("y"), Err(EvalError::UnboundVariable("y".to_string())));
    }
}
