use crate::common::{Int, NonZeroUInt, UInt};
use rand::Rng;

/// Source of uniform random numbers for dice and `randint`.
///
/// Every [rand::Rng] is a `Roller`; tests substitute a deterministic one.
pub trait Roller {
    /// A value in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;

    /// A value in `low..=high`. Callers guarantee `low <= high`.
    fn between(&mut self, low: Int, high: Int) -> Int;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }

    fn between(&mut self, low: Int, high: Int) -> Int {
        self.gen_range(low..=high)
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;

    /// Counts upward from `initial` by `step`, wrapping each value into the requested range.
    pub(crate) struct StepRoller {
        current: UInt,
        step: UInt,
    }

    impl StepRoller {
        pub fn new(initial: NonZeroUInt, step: UInt) -> Self {
            Self {
                current: initial.get(),
                step,
            }
        }

        fn advance(&mut self) -> UInt {
            let ret = self.current;
            self.current += self.step;
            ret
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, sides: NonZeroUInt) -> UInt {
            (self.advance() - 1) % sides.get() + 1
        }

        fn between(&mut self, low: Int, high: Int) -> Int {
            let width = (high as i64 - low as i64 + 1) as u64;
            let offset = (self.advance() as u64 - 1) % width;
            (low as i64 + offset as i64) as Int
        }
    }
}
