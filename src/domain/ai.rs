/// Pursuer AI: greedy single-step chase.
///
/// Every accepted rat move the pursuer re-plans from scratch: solve
/// pursuer → rat on the current grid and take the first cell of that path.
/// Nothing is remembered between ticks, so when the rat leaves the old
/// route the next plan simply follows it.

use super::grid::{Cell, Grid};
use super::path;

/// Where the pursuer should step next, or `None` when it should stay put
/// (already on the rat, or the rat is unreachable).
pub fn next_step(grid: &Grid, pursuer: Cell, rat: Cell) -> Option<Cell> {
    path::find_path(grid, pursuer, rat)?.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::Tile;

    #[test]
    fn steps_along_an_optimal_route() {
        let g = Grid::walled(5);
        let step = next_step(&g, Cell::new(3, 3), Cell::new(1, 1)).unwrap();
        assert!(step == Cell::new(3, 2) || step == Cell::new(2, 3), "got {step}");
    }

    #[test]
    fn stays_put_when_unreachable() {
        let mut g = Grid::walled(5);
        // seal the rat in the top-left corner
        g.set(Cell::new(1, 2), Tile::Wall);
        g.set(Cell::new(2, 1), Tile::Wall);
        assert_eq!(next_step(&g, Cell::new(3, 3), Cell::new(1, 1)), None);
    }

    #[test]
    fn stays_put_on_the_rat() {
        let g = Grid::walled(5);
        assert_eq!(next_step(&g, Cell::new(2, 2), Cell::new(2, 2)), None);
    }

    #[test]
    fn adjacent_rat_is_one_step_away() {
        let g = Grid::walled(5);
        assert_eq!(next_step(&g, Cell::new(2, 2), Cell::new(1, 2)), Some(Cell::new(1, 2)));
    }

    #[test]
    fn never_steps_into_a_wall() {
        let mut g = Grid::walled(7);
        for r in 1..5 {
            g.set(Cell::new(r, 3), Tile::Wall);
        }
        let mut pursuer = Cell::new(1, 1);
        let rat = Cell::new(1, 5);
        for _ in 0..20 {
            match next_step(&g, pursuer, rat) {
                Some(next) => {
                    assert!(g.is_open(next));
                    assert!(pursuer.is_adjacent(next));
                    pursuer = next;
                }
                None => break,
            }
        }
        assert_eq!(pursuer, rat);
    }
}
