/// Session: the complete state of one playthrough.
///
/// ## Lifecycle
///
/// A session is built once from a grid + layout (`Session::new`), mutated
/// only by `sim::step` while it is Active, and thrown away on restart.
/// Nothing is ever reset in place: `Game::restart` builds a fresh one.
///
/// ## Invariants (checked at construction)
///
///   - rat, pursuer, hole and every trap are in bounds and Open
///   - all of those cells are pairwise distinct
///   - there is at least one trap
///
/// After construction the grid and goal set are read-only; only the two
/// positions, the outcome and the difficulty change.

use thiserror::Error;

use crate::domain::entity::{GoalSet, Layout};
use crate::domain::grid::{Cell, Grid};
use crate::domain::rules::{Difficulty, Outcome};

/// A maze source handed over a layout that breaks the session invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{what} at {cell} is outside the {width}x{height} grid")]
    OutOfBounds { what: &'static str, cell: Cell, width: usize, height: usize },
    #[error("{what} at {cell} is on a wall")]
    OnWall { what: &'static str, cell: Cell },
    #[error("{first} and {second} share cell {cell}")]
    Overlap { first: &'static str, second: &'static str, cell: Cell },
    #[error("layout has no traps")]
    NoTraps,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub(crate) grid: Grid,
    pub(crate) goals: GoalSet,
    pub(crate) rat: Cell,
    pub(crate) pursuer: Cell,
    pub(crate) outcome: Outcome,
    pub(crate) difficulty: Difficulty,
    /// Accepted rat moves so far.
    pub(crate) moves: u32,
}

// ── Construction ──

impl Session {
    pub fn new(grid: Grid, layout: Layout, difficulty: Difficulty) -> Result<Self, SessionError> {
        validate(&grid, &layout)?;
        let Layout { rat, pursuer, goals } = layout;
        tracing::debug!(
            %rat, %pursuer, hole = %goals.hole, traps = goals.traps.len(),
            difficulty = difficulty.level(),
            "session created"
        );
        Ok(Session {
            grid,
            goals,
            rat,
            pursuer,
            outcome: Outcome::Active,
            difficulty,
            moves: 0,
        })
    }
}

fn validate(grid: &Grid, layout: &Layout) -> Result<(), SessionError> {
    if layout.goals.traps.is_empty() {
        return Err(SessionError::NoTraps);
    }

    let mut placed: Vec<(&'static str, Cell)> = vec![
        ("rat", layout.rat),
        ("pursuer", layout.pursuer),
        ("hole", layout.goals.hole),
    ];
    placed.extend(layout.goals.traps.iter().map(|&t| ("trap", t)));

    for (i, &(what, cell)) in placed.iter().enumerate() {
        if !grid.contains(cell) {
            return Err(SessionError::OutOfBounds {
                what, cell, width: grid.width(), height: grid.height(),
            });
        }
        if !grid.is_open(cell) {
            return Err(SessionError::OnWall { what, cell });
        }
        if let Some(&(first, _)) = placed[..i].iter().find(|(_, c)| *c == cell) {
            return Err(SessionError::Overlap { first, second: what, cell });
        }
    }
    Ok(())
}

// ── Queries (renderer, tests) ──

impl Session {
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn goals(&self) -> &GoalSet { &self.goals }
    pub fn rat(&self) -> Cell { self.rat }
    pub fn pursuer(&self) -> Cell { self.pursuer }
    pub fn outcome(&self) -> Outcome { self.outcome }
    pub fn difficulty(&self) -> Difficulty { self.difficulty }
    pub fn moves(&self) -> u32 { self.moves }

    /// Has the session reached Won / Trapped / Caught?
    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout {
            rat: Cell::new(1, 1),
            pursuer: Cell::new(3, 3),
            goals: GoalSet { hole: Cell::new(1, 3), traps: vec![Cell::new(3, 1)] },
        }
    }

    #[test]
    fn valid_layout_starts_active() {
        let s = Session::new(Grid::walled(5), layout(), Difficulty::new(2)).unwrap();
        assert_eq!(s.outcome(), Outcome::Active);
        assert!(!s.is_over());
        assert_eq!(s.rat(), Cell::new(1, 1));
        assert_eq!(s.pursuer(), Cell::new(3, 3));
        assert_eq!(s.difficulty().level(), 2);
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn rejects_overlap() {
        let mut l = layout();
        l.goals.traps.push(l.goals.hole);
        let err = Session::new(Grid::walled(5), l, Difficulty::MIN).unwrap_err();
        assert_eq!(err, SessionError::Overlap { first: "hole", second: "trap", cell: Cell::new(1, 3) });
    }

    #[test]
    fn rejects_rat_on_pursuer() {
        let mut l = layout();
        l.pursuer = l.rat;
        let err = Session::new(Grid::walled(5), l, Difficulty::MIN).unwrap_err();
        assert!(matches!(err, SessionError::Overlap { first: "rat", second: "pursuer", .. }));
    }

    #[test]
    fn rejects_wall_and_out_of_bounds() {
        let mut l = layout();
        l.goals.hole = Cell::new(0, 2);
        assert_eq!(
            Session::new(Grid::walled(5), l, Difficulty::MIN).unwrap_err(),
            SessionError::OnWall { what: "hole", cell: Cell::new(0, 2) },
        );

        let mut l = layout();
        l.rat = Cell::new(7, 1);
        assert!(matches!(
            Session::new(Grid::walled(5), l, Difficulty::MIN),
            Err(SessionError::OutOfBounds { what: "rat", .. })
        ));
    }

    #[test]
    fn rejects_missing_traps() {
        let mut l = layout();
        l.goals.traps.clear();
        assert_eq!(Session::new(Grid::walled(5), l, Difficulty::MIN).unwrap_err(), SessionError::NoTraps);
    }
}
