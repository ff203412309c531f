/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound; they are also logged.

use crate::domain::entity::MoveDir;
use crate::domain::grid::Cell;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    RatMoved { to: Cell },
    MoveRejected { dir: MoveDir },
    PursuerMoved { to: Cell },
    /// No route to the rat this tick; the pursuer held its cell.
    PursuerBlocked,
    Won { difficulty: u8 },
    Trapped { difficulty: u8 },
    Caught { difficulty: u8 },
}

impl GameEvent {
    /// Did this step consume a move (and so start the cooldown)?
    pub fn is_accepted_move(&self) -> bool {
        matches!(self, GameEvent::RatMoved { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Won { .. } | GameEvent::Trapped { .. } | GameEvent::Caught { .. })
    }
}
