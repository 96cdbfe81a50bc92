use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::ops::Range;

#[cfg(test)]
use mockall::automock;

/// Operands are drawn from this half-open range, i.e. single digits.
pub const OPERAND_RANGE: Range<u8> = 0..10;

/// The two operations a drill exercise can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
}

impl Operator {
    /// The spoken German word for the operator.
    pub fn word(self) -> &'static str {
        match self {
            Operator::Plus => "plus",
            Operator::Minus => "minus",
        }
    }
}

/// A single arithmetic exercise.
///
/// Operands are stored in the order they are spoken. For subtraction that means
/// the larger operand always comes first, so `result` is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub operand_a: u8,
    pub operand_b: u8,
    pub operator: Operator,
    pub rendered_text: String,
    pub result: i64,
}

impl Exercise {
    /// Builds an exercise from two drawn operands.
    ///
    /// Subtraction reorders the operands into `max - min`.
    pub fn from_operands(a: u8, b: u8, operator: Operator) -> Self {
        let (operand_a, operand_b) = match operator {
            Operator::Plus => (a, b),
            Operator::Minus => (a.max(b), a.min(b)),
        };
        let result = match operator {
            Operator::Plus => i64::from(operand_a) + i64::from(operand_b),
            Operator::Minus => i64::from(operand_a) - i64::from(operand_b),
        };

        Self {
            operand_a,
            operand_b,
            operator,
            rendered_text: format!("{} {} {}", operand_a, operator.word(), operand_b),
            result,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered_text)
    }
}

// Anything that can hand out the next exercise. The dialog controller only
// depends on this trait, so tests can script the exercises it receives.
#[cfg_attr(test, automock)]
pub trait ExerciseSource {
    fn next_exercise(&mut self) -> Exercise;
}

/// Draws random single-digit addition and subtraction exercises.
pub struct ExerciseGenerator<R> {
    rng: R,
}

impl ExerciseGenerator<StdRng> {
    /// A generator with a reproducible sequence of exercises.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> ExerciseGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self) -> Exercise {
        let a = self.rng.gen_range(OPERAND_RANGE);
        let b = self.rng.gen_range(OPERAND_RANGE);
        let operator = if self.rng.gen_bool(0.5) {
            Operator::Plus
        } else {
            Operator::Minus
        };

        Exercise::from_operands(a, b, operator)
    }
}

impl<R: Rng> ExerciseSource for ExerciseGenerator<R> {
    fn next_exercise(&mut self) -> Exercise {
        self.generate()
    }
}
