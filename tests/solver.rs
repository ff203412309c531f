//! Solver and pursuer checked against a brute-force BFS on random grids.

use pathfinding::prelude::bfs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use maze_escape::domain::ai;
use maze_escape::domain::grid::{Cell, Grid};
use maze_escape::domain::path::find_path;
use maze_escape::domain::tile::Tile;

fn random_grid(rng: &mut StdRng, size: usize, walls: usize) -> Grid {
    let mut grid = Grid::walled(size);
    for _ in 0..walls {
        let cell = Cell::new(rng.gen_range(1..size - 1), rng.gen_range(1..size - 1));
        grid.set(cell, Tile::Wall);
    }
    grid
}

fn bfs_distance(grid: &Grid, start: Cell, target: Cell) -> Option<usize> {
    bfs(&start, |c| grid.open_neighbors(*c).collect::<Vec<_>>(), |c| *c == target)
        .map(|p| p.len() - 1)
}

fn assert_valid_path(grid: &Grid, start: Cell, target: Cell, path: &[Cell]) {
    let mut prev = start;
    for &cell in path {
        assert!(grid.is_open(cell), "path crosses wall at {cell}");
        assert!(prev.is_adjacent(cell), "{prev} -> {cell} is not a unit step");
        prev = cell;
    }
    assert_eq!(prev, target);
}

#[test]
fn path_length_matches_bfs() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = random_grid(&mut rng, 7, 12);
        let open = grid.open_cells();
        for &start in &open {
            for &target in &open {
                let expected = bfs_distance(&grid, start, target);
                let found = find_path(&grid, start, target);
                assert_eq!(found.as_ref().map(Vec::len), expected, "seed {seed}: {start} -> {target}");
                if let Some(path) = found {
                    assert_valid_path(&grid, start, target, &path);
                }
            }
        }
    }
}

#[test]
fn walled_off_target_has_no_path() {
    let mut grid = Grid::walled(7);
    // ring of walls around (3,3)
    for cell in [Cell::new(2, 3), Cell::new(4, 3), Cell::new(3, 2), Cell::new(3, 4)] {
        grid.set(cell, Tile::Wall);
    }
    for start in grid.open_cells().into_iter().filter(|&c| c != Cell::new(3, 3)) {
        assert_eq!(find_path(&grid, start, Cell::new(3, 3)), None);
        assert_eq!(bfs_distance(&grid, start, Cell::new(3, 3)), None);
    }
}

#[test]
fn repeated_calls_agree() {
    let mut rng = StdRng::seed_from_u64(99);
    let grid = random_grid(&mut rng, 9, 20);
    let open = grid.open_cells();
    let (start, target) = (open[0], open[open.len() - 1]);
    let first = find_path(&grid, start, target);
    for _ in 0..10 {
        assert_eq!(find_path(&grid, start, target), first);
    }
}

#[test]
fn open_room_scenario() {
    let grid = Grid::walled(5);
    let rat = Cell::new(1, 1);
    let pursuer = Cell::new(3, 3);

    let path = find_path(&grid, pursuer, rat).unwrap();
    assert_eq!(path.len(), 4);
    assert!(path.iter().all(|&c| grid.is_open(c)));

    let next = ai::next_step(&grid, pursuer, rat).unwrap();
    assert!(next == Cell::new(3, 2) || next == Cell::new(2, 3), "got {next}");
}

#[test]
fn pursuer_only_steps_onto_open_neighbors() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed + 100);
        let grid = random_grid(&mut rng, 8, 15);
        let open = grid.open_cells();
        for &pursuer in &open {
            let rat = open[rng.gen_range(0..open.len())];
            if let Some(next) = ai::next_step(&grid, pursuer, rat) {
                assert!(grid.is_open(next));
                assert!(pursuer.is_adjacent(next));
                // one step closer along a shortest route
                let before = bfs_distance(&grid, pursuer, rat).unwrap();
                let after = bfs_distance(&grid, next, rat).unwrap();
                assert_eq!(after + 1, before);
            } else {
                assert!(pursuer == rat || bfs_distance(&grid, pursuer, rat).is_none());
            }
        }
    }
}
