/// Entities and the fixed goal layout of a session.
///
/// The rat and the pursuer are bare positions: all of their behaviour lives
/// in `sim::step` (rat) and `domain::ai` (pursuer).

use super::grid::Cell;

/// Movement direction (4-directional, one cell per accepted move).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    /// Order in which the solver expands neighbours.
    pub const SEARCH_ORDER: [MoveDir; 4] = [MoveDir::Right, MoveDir::Left, MoveDir::Down, MoveDir::Up];

    /// `(d_row, d_col)` for one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            MoveDir::Up => (-1, 0),
            MoveDir::Down => (1, 0),
            MoveDir::Left => (0, -1),
            MoveDir::Right => (0, 1),
        }
    }
}

/// The goal hole and the traps. Fixed for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalSet {
    pub hole: Cell,
    pub traps: Vec<Cell>,
}

impl GoalSet {
    pub fn is_trap(&self, cell: Cell) -> bool {
        self.traps.contains(&cell)
    }
}

/// Everything a maze source hands to a new session besides the grid:
/// the two starting positions plus the goal set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub rat: Cell,
    pub pursuer: Cell,
    pub goals: GoalSet,
}
