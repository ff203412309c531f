/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Open,
    Wall,
}

impl Tile {
    /// Can an entity occupy this tile?
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Open)
    }

    /// Blocks movement and line of travel.
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }
}
