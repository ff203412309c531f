/// Random maze generator.
///
/// ## Recipe
///   1. Square grid, border cells Wall, interior Open.
///   2. `base_walls + walls_per_level * difficulty` scatter attempts: pick a
///      random interior cell and wall it. Hitting an existing wall is a
///      no-op, so the wall count is an upper bound.
///   3. Shuffle the remaining Open cells and deal them out in order: rat, pursuer,
///      hole, then `1 + difficulty` traps.
///
/// Every special cell comes off the same shuffled list, so they are
/// distinct and Open by construction. Nothing here checks that the hole is
/// reachable: a walled-off hole is a legal (if unlucky) maze.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::domain::entity::{GoalSet, Layout};
use crate::domain::grid::{Cell, Grid};
use crate::domain::rules::Difficulty;
use crate::domain::tile::Tile;

/// Smallest maze with an interior worth playing in.
pub const MIN_SIZE: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze size {0} is below the minimum of {min}", min = MIN_SIZE)]
    TooSmall(usize),
    #[error("maze needs {needed} open cells for its pieces but only {available} are left")]
    TooCrowded { needed: usize, available: usize },
}

/// Generator knobs (from `[maze]` in config.toml).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeParams {
    pub size: usize,
    pub base_walls: usize,
    pub walls_per_level: usize,
}

impl Default for MazeParams {
    fn default() -> Self {
        MazeParams { size: 9, base_walls: 4, walls_per_level: 2 }
    }
}

impl MazeParams {
    pub fn wall_attempts(&self, difficulty: Difficulty) -> usize {
        self.base_walls + self.walls_per_level * difficulty.level() as usize
    }

    /// Checks the worst case up front: every wall attempt at `Difficulty::MAX`
    /// landing on a distinct cell must still leave room for all the pieces.
    /// Params that pass can be generated at any difficulty.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.size < MIN_SIZE {
            return Err(MazeError::TooSmall(self.size));
        }
        let interior = (self.size - 2) * (self.size - 2);
        let needed = 3 + trap_count(Difficulty::MAX);
        let available = interior.saturating_sub(self.wall_attempts(Difficulty::MAX));
        if available < needed {
            return Err(MazeError::TooCrowded { needed, available });
        }
        Ok(())
    }
}

/// Number of traps placed at a difficulty level.
pub fn trap_count(difficulty: Difficulty) -> usize {
    1 + difficulty.level() as usize
}

pub fn generate<R: Rng>(
    params: &MazeParams,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<(Grid, Layout), MazeError> {
    let size = params.size;
    if size < MIN_SIZE {
        return Err(MazeError::TooSmall(size));
    }

    let mut grid = Grid::walled(size);
    for _ in 0..params.wall_attempts(difficulty) {
        let row = rng.gen_range(1..=size - 2);
        let col = rng.gen_range(1..=size - 2);
        grid.set(Cell::new(row, col), Tile::Wall);
    }

    let mut empty = grid.open_cells();
    let traps = trap_count(difficulty);
    let needed = 3 + traps;
    if empty.len() < needed {
        return Err(MazeError::TooCrowded { needed, available: empty.len() });
    }
    empty.shuffle(rng);

    // length checked above
    let (rat, pursuer, hole) = (empty[0], empty[1], empty[2]);
    let traps = empty[3..needed].to_vec();

    tracing::debug!(size, difficulty = difficulty.level(), open = grid.open_cells().len(), "maze generated");

    Ok((grid, Layout { rat, pursuer, goals: GoalSet { hole, traps } }))
}
