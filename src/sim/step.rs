/// The step function: advances a session by one accepted-input tick.
///
/// Processing order:
///   1. Rat move (bounds + wall check; a rejected move changes nothing)
///   2. Encounter check on the rat's new cell
///   3. Pursuer re-plans and takes one step (only if still Active)
///   4. Encounter check again
///
/// A terminal outcome at step 2 ends the tick: the pursuer does not move.

use crate::domain::ai;
use crate::domain::entity::MoveDir;
use crate::domain::rules::{self, Outcome};
use super::event::GameEvent;
use super::session::Session;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut Session, dir: MoveDir) -> Vec<GameEvent> {
    if session.is_over() { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();

    if !resolve_rat_move(session, dir, &mut events) { return events; }
    if resolve_encounter(session, &mut events) { return events; }
    resolve_pursuit(session, &mut events);
    resolve_encounter(session, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Rat
// ══════════════════════════════════════════════════════════════

/// Returns false when the move was rejected.
fn resolve_rat_move(session: &mut Session, dir: MoveDir, events: &mut Vec<GameEvent>) -> bool {
    let target = session.grid.offset(session.rat, dir).filter(|&c| session.grid.is_open(c));
    match target {
        Some(to) => {
            session.rat = to;
            session.moves += 1;
            events.push(GameEvent::RatMoved { to });
            true
        }
        None => {
            tracing::debug!(?dir, rat = %session.rat, "move rejected");
            events.push(GameEvent::MoveRejected { dir });
            false
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Pursuer
// ══════════════════════════════════════════════════════════════

fn resolve_pursuit(session: &mut Session, events: &mut Vec<GameEvent>) {
    match ai::next_step(&session.grid, session.pursuer, session.rat) {
        Some(to) => {
            session.pursuer = to;
            events.push(GameEvent::PursuerMoved { to });
        }
        None => {
            tracing::debug!(pursuer = %session.pursuer, rat = %session.rat, "pursuer has no route");
            events.push(GameEvent::PursuerBlocked);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Encounter
// ══════════════════════════════════════════════════════════════

/// Apply the encounter table. Returns true if the session just ended.
fn resolve_encounter(session: &mut Session, events: &mut Vec<GameEvent>) -> bool {
    let outcome = rules::evaluate(session.rat, session.pursuer, &session.goals);
    if !outcome.is_terminal() { return false; }

    session.outcome = outcome;
    session.difficulty = session.difficulty.after(outcome);
    let difficulty = session.difficulty.level();

    tracing::info!(?outcome, moves = session.moves, difficulty, "session over");

    events.push(match outcome {
        Outcome::Won => GameEvent::Won { difficulty },
        Outcome::Trapped => GameEvent::Trapped { difficulty },
        Outcome::Caught => GameEvent::Caught { difficulty },
        Outcome::Active => unreachable!("filtered above"),
    });
    true
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
