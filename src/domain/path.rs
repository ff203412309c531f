/// Shortest-path solver: A* over the 4-connected Open cells of a `Grid`.
///
/// Every edge costs 1 and the heuristic is the Manhattan distance to the
/// target, which is consistent on a 4-connected unit grid, so the first time
/// the target is popped its path is optimal and no cell needs to be
/// expanded twice.
///
/// Score tables are flat arrays indexed by `Grid::index`. The open set is a
/// min-heap keyed on `(f, seq)`: `seq` is a push counter, so candidates with
/// equal `f` come out in insertion order. Same inputs, same path.
///
/// The caller guarantees that `start` and `target` are Open; they are not
/// re-checked here.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::grid::{Cell, Grid};

const UNSEEN: u32 = u32::MAX;

/// Path from `start` (exclusive) to `target` (inclusive), or `None` when the
/// target cannot be reached. `start == target` gives an empty path.
pub fn find_path(grid: &Grid, start: Cell, target: Cell) -> Option<Vec<Cell>> {
    if start == target {
        return Some(Vec::new());
    }

    let n = grid.len();
    let mut g_score = vec![UNSEEN; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];

    let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::with_capacity(64);
    let mut seq: u64 = 0;

    let start_idx = grid.index(start);
    let target_idx = grid.index(target);
    g_score[start_idx] = 0;
    open.push(Reverse((start.manhattan(target), seq, start_idx)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == target_idx {
            return Some(reconstruct(grid, &came_from, start_idx, target_idx));
        }
        if closed[current] {
            continue;
        }
        closed[current] = true;

        let here = grid.cell_at(current);
        let tentative = g_score[current] + 1;
        for next in grid.open_neighbors(here) {
            let ni = grid.index(next);
            if closed[ni] || tentative >= g_score[ni] {
                continue;
            }
            came_from[ni] = Some(current);
            g_score[ni] = tentative;
            seq += 1;
            open.push(Reverse((tentative.saturating_add(next.manhattan(target)), seq, ni)));
        }
    }

    None
}

fn reconstruct(grid: &Grid, came_from: &[Option<usize>], start: usize, target: usize) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = target;
    while current != start {
        path.push(grid.cell_at(current));
        match came_from[current] {
            Some(prev) => current = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::Tile;

    /// Build a grid from a diagram. '#' = Wall, anything else Open.
    fn grid_from(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let mut g = Grid::filled(width, height, Tile::Open);
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if ch == '#' {
                    g.set(Cell::new(r, c), Tile::Wall);
                }
            }
        }
        g
    }

    fn assert_walkable(g: &Grid, start: Cell, path: &[Cell]) {
        let mut prev = start;
        for &c in path {
            assert!(g.is_open(c), "path crosses wall at {c}");
            assert!(prev.is_adjacent(c), "path jumps {prev} -> {c}");
            prev = c;
        }
    }

    #[test]
    fn open_room_path_is_manhattan() {
        let g = Grid::walled(5);
        let start = Cell::new(3, 3);
        let target = Cell::new(1, 1);
        let path = find_path(&g, start, target).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(*path.last().unwrap(), target);
        assert!(!path.contains(&start));
        assert_walkable(&g, start, &path);
    }

    #[test]
    fn same_cell_is_empty_path() {
        let g = Grid::walled(5);
        let c = Cell::new(2, 2);
        assert_eq!(find_path(&g, c, c), Some(vec![]));
    }

    #[test]
    fn adjacent_target_is_single_step() {
        let g = Grid::walled(5);
        let path = find_path(&g, Cell::new(2, 2), Cell::new(2, 3)).unwrap();
        assert_eq!(path, vec![Cell::new(2, 3)]);
    }

    #[test]
    fn detours_around_wall() {
        let g = grid_from(&[
            "#######",
            "#.....#",
            "#.###.#",
            "#.#...#",
            "#######",
        ]);
        let start = Cell::new(3, 1);
        let target = Cell::new(3, 3);
        let path = find_path(&g, start, target).unwrap();
        // up and over the wall block: (2,1) (1,1) .. (1,5) (2,5) (3,5) (3,4) (3,3)
        assert_eq!(path.len(), 10);
        assert_walkable(&g, start, &path);
    }

    #[test]
    fn walled_off_target_is_unreachable() {
        let g = grid_from(&[
            "#####",
            "#..##",
            "#.#.#",
            "#####",
        ]);
        assert_eq!(find_path(&g, Cell::new(1, 1), Cell::new(2, 3)), None);
    }

    #[test]
    fn repeated_calls_agree() {
        let g = grid_from(&[
            "#########",
            "#.......#",
            "#.#.#.#.#",
            "#.......#",
            "#.#.#.#.#",
            "#.......#",
            "#########",
        ]);
        let a = find_path(&g, Cell::new(5, 7), Cell::new(1, 1));
        let b = find_path(&g, Cell::new(5, 7), Cell::new(1, 1));
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
