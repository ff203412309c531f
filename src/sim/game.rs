/// Game: owns the current session and everything that outlives it.
///
/// The session is replaced wholesale on restart; the game keeps the maze
/// source, the RNG and the move cooldown.
///
/// ## Move cooldown
///
/// `frame()` is called once per render frame. A directional intent is only
/// acted on when the cooldown is zero; an accepted move re-arms it to
/// `cooldown_frames`. The counter then drains by one per frame, so with the
/// default 15 frames at ~30 fps the rat moves at most twice per second no
/// matter how fast frames are drawn. A rejected move (wall, edge) leaves
/// the cooldown untouched.

use std::path::Path;

use rand::rngs::StdRng;
use thiserror::Error;

use crate::domain::entity::{Layout, MoveDir};
use crate::domain::grid::Grid;
use crate::domain::rules::Difficulty;
use super::event::GameEvent;
use super::layout::{self, LayoutError};
use super::maze::{self, MazeError, MazeParams};
use super::session::{Session, SessionError};
use super::step;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("invalid session: {0}")]
    Session(#[from] SessionError),
}

/// Where new sessions come from.
#[derive(Clone, Debug)]
pub enum MazeSource {
    /// Fresh random maze per session.
    Random(MazeParams),
    /// The same hand-made maze every session.
    Fixed { grid: Grid, layout: Layout },
}

impl MazeSource {
    /// Parse a layout file into a fixed source.
    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let (grid, layout) = layout::load_file(path)?;
        Ok(MazeSource::Fixed { grid, layout })
    }

    fn build(&self, difficulty: Difficulty, rng: &mut StdRng) -> Result<Session, GameError> {
        let (grid, layout) = match self {
            MazeSource::Random(params) => maze::generate(params, difficulty, rng)?,
            MazeSource::Fixed { grid, layout } => (grid.clone(), layout.clone()),
        };
        Ok(Session::new(grid, layout, difficulty)?)
    }
}

pub struct Game {
    session: Session,
    source: MazeSource,
    rng: StdRng,
    cooldown: u32,
    cooldown_frames: u32,
    sessions_played: u32,
}

impl Game {
    pub fn new(
        source: MazeSource,
        difficulty: Difficulty,
        cooldown_frames: u32,
        mut rng: StdRng,
    ) -> Result<Self, GameError> {
        // restarts may raise the difficulty, so reject params that only work at low levels
        if let MazeSource::Random(params) = &source {
            params.validate()?;
        }
        let session = source.build(difficulty, &mut rng)?;
        Ok(Game {
            session,
            source,
            rng,
            cooldown: 0,
            cooldown_frames,
            sessions_played: 1,
        })
    }

    pub fn session(&self) -> &Session { &self.session }
    pub fn cooldown(&self) -> u32 { self.cooldown }
    pub fn sessions_played(&self) -> u32 { self.sessions_played }

    /// Advance one render frame with the currently held direction.
    pub fn frame(&mut self, intent: Option<MoveDir>) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.cooldown == 0 && !self.session.is_over() {
            if let Some(dir) = intent {
                events = step::step(&mut self.session, dir);
                if events.iter().any(GameEvent::is_accepted_move) {
                    self.cooldown = self.cooldown_frames;
                }
            }
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
        }

        events
    }

    /// Start a new session at the carried-over difficulty.
    ///
    /// Only honoured once the current session has ended; returns `Ok(false)`
    /// while it is still Active.
    pub fn restart(&mut self) -> Result<bool, GameError> {
        if !self.session.is_over() {
            return Ok(false);
        }
        let difficulty = self.session.difficulty();
        self.session = self.source.build(difficulty, &mut self.rng)?;
        self.sessions_played += 1;
        tracing::info!(difficulty = difficulty.level(), session = self.sessions_played, "restarted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::domain::grid::Cell;
    use crate::domain::rules::Outcome;

    const CORRIDOR: &str = "\
#######
#R.H..#
#.....#
#T...M#
#######
";

    fn fixed_game(cooldown: u32) -> Game {
        let (grid, layout) = layout::parse(CORRIDOR).unwrap();
        Game::new(
            MazeSource::Fixed { grid, layout },
            Difficulty::new(2),
            cooldown,
            StdRng::seed_from_u64(0),
        )
        .unwrap()
    }

    #[test]
    fn cooldown_spaces_out_moves() {
        let mut g = fixed_game(3);
        assert!(!g.frame(Some(MoveDir::Down)).is_empty());
        assert_eq!(g.session().rat(), Cell::new(2, 1));
        // armed to 3, drained to 2 by the same frame
        assert_eq!(g.cooldown(), 2);
        assert!(g.frame(Some(MoveDir::Right)).is_empty());
        assert!(g.frame(Some(MoveDir::Right)).is_empty());
        assert_eq!(g.cooldown(), 0);
        assert!(!g.frame(Some(MoveDir::Right)).is_empty());
        assert_eq!(g.session().rat(), Cell::new(2, 2));
    }

    #[test]
    fn rejected_move_costs_no_cooldown() {
        let mut g = fixed_game(5);
        let events = g.frame(Some(MoveDir::Up));
        assert_eq!(events, vec![GameEvent::MoveRejected { dir: MoveDir::Up }]);
        assert_eq!(g.cooldown(), 0);
        assert!(g.frame(Some(MoveDir::Right)).iter().any(GameEvent::is_accepted_move));
    }

    #[test]
    fn idle_frames_do_nothing() {
        let mut g = fixed_game(0);
        assert!(g.frame(None).is_empty());
        assert_eq!(g.session().moves(), 0);
    }

    #[test]
    fn restart_only_after_session_ends() {
        let mut g = fixed_game(0);
        assert!(!g.restart().unwrap());
        assert_eq!(g.sessions_played(), 1);

        g.frame(Some(MoveDir::Right));
        g.frame(Some(MoveDir::Right));
        assert_eq!(g.session().outcome(), Outcome::Won);
        assert_eq!(g.session().difficulty().level(), 3);
        // no more movement once terminal
        assert!(g.frame(Some(MoveDir::Down)).is_empty());

        assert!(g.restart().unwrap());
        assert_eq!(g.sessions_played(), 2);
        assert_eq!(g.session().outcome(), Outcome::Active);
        assert_eq!(g.session().difficulty().level(), 3);
        assert_eq!(g.session().rat(), Cell::new(1, 1));
    }

    #[test]
    fn random_source_builds_sessions() {
        let mut g = Game::new(
            MazeSource::Random(MazeParams::default()),
            Difficulty::new(9),
            0,
            StdRng::seed_from_u64(11),
        )
        .unwrap();
        assert_eq!(g.session().difficulty(), Difficulty::MAX);
        assert_eq!(g.session().goals().traps.len(), 6);
        assert!(!g.restart().unwrap());
    }

    #[test]
    fn crowded_params_rejected_at_startup() {
        // 7x7: 25 interior cells, fine at level 1 but 4 + 6*5 wall attempts at level 5
        let params = MazeParams { size: 7, base_walls: 4, walls_per_level: 6 };
        let err = Game::new(MazeSource::Random(params), Difficulty::MIN, 0, StdRng::seed_from_u64(0));
        assert!(matches!(err, Err(GameError::Maze(MazeError::TooCrowded { needed: 9, available: 0 }))));
    }

    #[test]
    fn bad_fixed_layout_is_fatal() {
        let (grid, mut layout) = layout::parse(CORRIDOR).unwrap();
        layout.pursuer = layout.rat;
        let err = Game::new(MazeSource::Fixed { grid, layout }, Difficulty::MIN, 0, StdRng::seed_from_u64(0));
        assert!(matches!(err, Err(GameError::Session(SessionError::Overlap { .. }))));
    }
}
