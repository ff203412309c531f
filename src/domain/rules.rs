/// Encounter rules and difficulty bounds.
///
/// Pure functions: given the positions after a move, decide whether the
/// session ends and how the difficulty changes. No side effects here;
/// `sim::step` applies the result to the session.
///
/// ## Encounter Table
///
/// Checked top to bottom on the rat's cell, first match wins:
///
/// | Condition              | Outcome  | Difficulty |
/// |------------------------|----------|------------|
/// | rat on the hole        | Won      | +1, max 5  |
/// | rat on a trap          | Trapped  | -1, min 1  |
/// | rat on the pursuer     | Caught   | -1, min 1  |
/// | otherwise              | Active   | unchanged  |

use super::entity::GoalSet;
use super::grid::Cell;

/// Session state. Everything except `Active` is terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Outcome {
    #[default]
    Active,
    Won,
    Trapped,
    Caught,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Active)
    }

    /// Banner text shown over the maze.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Active => "",
            Outcome::Won => "YOU WIN! Press R to restart",
            Outcome::Trapped => "TRAPPED! Press R to restart",
            Outcome::Caught => "CAUGHT! Press R to restart",
        }
    }
}

/// Bounded difficulty level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(5);

    /// Clamp any level into `MIN..=MAX`.
    pub fn new(level: u8) -> Self {
        Difficulty(level.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn raised(self) -> Self {
        Difficulty::new(self.0.saturating_add(1))
    }

    pub fn lowered(self) -> Self {
        Difficulty::new(self.0.saturating_sub(1))
    }

    /// Difficulty after a session ends with `outcome`.
    pub fn after(self, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Active => self,
            Outcome::Won => self.raised(),
            Outcome::Trapped | Outcome::Caught => self.lowered(),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::MIN
    }
}

/// Apply the encounter table.
pub fn evaluate(rat: Cell, pursuer: Cell, goals: &GoalSet) -> Outcome {
    if rat == goals.hole {
        Outcome::Won
    } else if goals.is_trap(rat) {
        Outcome::Trapped
    } else if rat == pursuer {
        Outcome::Caught
    } else {
        Outcome::Active
    }
}
