/// Fixed maze layouts from text.
///
/// ## Format
///   One line per grid row, all rows the same width. Blank trailing lines
///   are ignored; lines starting with `;` are comments.
///
/// ## Legend
///   '#' = Wall        '.' / ' ' = Open
///   'R' = Rat start   'M' = Pursuer start
///   'H' = Goal hole   'T' = Trap
///
/// Exactly one R, M and H; at least one T. Special cells are Open.
/// Whether the pieces form a valid session is still checked by
/// `Session::new`.

use std::path::Path;

use thiserror::Error;

use crate::domain::entity::{GoalSet, Layout};
use crate::domain::grid::{Cell, Grid};
use crate::domain::tile::Tile;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("could not read layout: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout is empty")]
    Empty,
    #[error("row {row} is {found} wide, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown glyph {glyph:?} at {cell}")]
    UnknownGlyph { glyph: char, cell: Cell },
    #[error("second {glyph:?} at {cell}")]
    Duplicate { glyph: char, cell: Cell },
    #[error("layout has no {0:?}")]
    Missing(char),
}

/// Read and parse a layout file.
pub fn load_file(path: &Path) -> Result<(Grid, Layout), LayoutError> {
    let text = std::fs::read_to_string(path)?;
    let parsed = parse(&text)?;
    tracing::info!(path = %path.display(), "loaded fixed layout");
    Ok(parsed)
}

/// Parse layout text.
pub fn parse(text: &str) -> Result<(Grid, Layout), LayoutError> {
    let rows: Vec<&str> = text
        .lines()
        .filter(|l| !l.starts_with(';'))
        .map(|l| l.trim_end_matches('\r'))
        .collect::<Vec<_>>();
    let rows = trim_trailing_blank(&rows);
    if rows.is_empty() {
        return Err(LayoutError::Empty);
    }

    let width = rows[0].chars().count();
    let mut grid = Grid::filled(width, rows.len(), Tile::Open);
    let mut rat = None;
    let mut pursuer = None;
    let mut hole = None;
    let mut traps = Vec::new();

    for (r, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::Ragged { row: r, expected: width, found });
        }
        for (c, glyph) in line.chars().enumerate() {
            let cell = Cell::new(r, c);
            match glyph {
                '#' => grid.set(cell, Tile::Wall),
                '.' | ' ' => {}
                'R' => place_once(&mut rat, glyph, cell)?,
                'M' => place_once(&mut pursuer, glyph, cell)?,
                'H' => place_once(&mut hole, glyph, cell)?,
                'T' => traps.push(cell),
                _ => return Err(LayoutError::UnknownGlyph { glyph, cell }),
            }
        }
    }

    let rat = rat.ok_or(LayoutError::Missing('R'))?;
    let pursuer = pursuer.ok_or(LayoutError::Missing('M'))?;
    let hole = hole.ok_or(LayoutError::Missing('H'))?;
    if traps.is_empty() {
        return Err(LayoutError::Missing('T'));
    }

    Ok((grid, Layout { rat, pursuer, goals: GoalSet { hole, traps } }))
}

fn place_once(slot: &mut Option<Cell>, glyph: char, cell: Cell) -> Result<(), LayoutError> {
    if slot.is_some() {
        return Err(LayoutError::Duplicate { glyph, cell });
    }
    *slot = Some(cell);
    Ok(())
}

fn trim_trailing_blank<'a>(rows: &'a [&'a str]) -> &'a [&'a str] {
    let end = rows.iter().rposition(|l| !l.trim().is_empty()).map_or(0, |i| i + 1);
    &rows[..end]
}
