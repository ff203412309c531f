/// Grid model: a fixed-size occupancy grid of Open / Wall tiles.
///
/// Coordinates are `(row, col)` with row 0 at the top. The grid is built
/// once per session (by the maze generator or a fixed layout) and only read
/// afterwards; every query here is side-effect free.
///
/// Tiles are stored row-major in one flat `Vec` so the solver can index its
/// score tables with the same `index()` the grid uses.

use super::entity::MoveDir;
use super::tile::Tile;

/// A single grid location.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Manhattan distance between two cells, saturating at `u32::MAX`.
    pub fn manhattan(self, other: Cell) -> u32 {
        let d = self.row.abs_diff(other.row).saturating_add(self.col.abs_diff(other.col));
        u32::try_from(d).unwrap_or(u32::MAX)
    }

    /// Are the two cells orthogonal neighbours?
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

// ── Construction ──

impl Grid {
    /// A grid filled with a single tile kind.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Grid { width, height, tiles: vec![tile; width * height] }
    }

    /// Square grid with a Wall border and an all-Open interior.
    pub fn walled(size: usize) -> Self {
        let mut grid = Grid::filled(size, size, Tile::Open);
        for row in 0..size {
            for col in 0..size {
                if row == 0 || col == 0 || row + 1 == size || col + 1 == size {
                    grid.tiles[row * size + col] = Tile::Wall;
                }
            }
        }
        grid
    }

    /// Overwrite one tile. Only used while a maze is being built; a
    /// session never mutates its grid.
    pub fn set(&mut self, cell: Cell, tile: Tile) {
        if self.contains(cell) {
            let i = self.index(cell);
            self.tiles[i] = tile;
        }
    }
}

// ── Queries ──

impl Grid {
    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Total number of cells (in-bounds indices are `0..len()`).
    pub fn len(&self) -> usize { self.tiles.len() }

    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    /// Is the cell inside the grid bounds?
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Tile at `cell`. Out of bounds reads as Wall.
    #[inline]
    pub fn tile(&self, cell: Cell) -> Tile {
        if self.contains(cell) {
            self.tiles[self.index(cell)]
        } else {
            Tile::Wall
        }
    }

    /// In bounds and traversable.
    #[inline]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.tile(cell).is_passable()
    }

    /// Row-major index of an in-bounds cell.
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// Inverse of `index()`.
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.width, index % self.width)
    }

    /// The in-bounds cell one step from `cell` in `dir`, if any.
    /// Says nothing about whether that cell is Open.
    pub fn offset(&self, cell: Cell, dir: MoveDir) -> Option<Cell> {
        let (dr, dc) = dir.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        let next = Cell::new(row, col);
        self.contains(next).then_some(next)
    }

    /// Open orthogonal neighbours of `cell`, in `MoveDir::SEARCH_ORDER`.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        MoveDir::SEARCH_ORDER
            .iter()
            .filter_map(move |&dir| self.offset(cell, dir))
            .filter(move |&next| self.is_open(next))
    }

    /// Every Open cell, row-major.
    pub fn open_cells(&self) -> Vec<Cell> {
        (0..self.tiles.len())
            .filter(|&i| self.tiles[i].is_passable())
            .map(|i| self.cell_at(i))
            .collect()
    }

    /// Iterate rows of tiles (renderer).
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1))
    }
}
