/// Keyboard state tracker.
///
/// Tracks which keys are currently held so the rat keeps walking while an
/// arrow key stays down (the move cooldown in `Game::frame` paces it).
/// Restart and quit are edge-triggered: they fire only on the initial press.
///
/// Plain terminals send no Release events, so a key counts as released once
/// no Press/Repeat has arrived for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

/// After this duration without a Press/Repeat event, consider the key released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub const RESTART_KEYS: [KeyCode; 2] = [KeyCode::Char('r'), KeyCode::Char('R')];
pub const QUIT_KEYS: [KeyCode; 3] = [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Arrow keys and WASD.
pub fn key_direction(code: KeyCode) -> Option<MoveDir> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(MoveDir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(MoveDir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(MoveDir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(MoveDir::Right),
        _ => None,
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per loop iteration, before the game frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    /// First held direction in the order Up, Down, Left, Right.
    /// Expired keys were already dropped by `drain_events`.
    pub fn held_direction(&self) -> Option<MoveDir> {
        [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right]
            .into_iter()
            .find(|&d| self.last_active.keys().any(|&code| key_direction(code) == Some(d)))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn restart_pressed(&self) -> bool {
        self.any_pressed(&RESTART_KEYS)
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c_pressed() || self.any_pressed(&QUIT_KEYS)
    }

    fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            // release is detected by timeout
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(key_direction(KeyCode::Up), Some(MoveDir::Up));
        assert_eq!(key_direction(KeyCode::Char('a')), Some(MoveDir::Left));
        assert_eq!(key_direction(KeyCode::Char('D')), Some(MoveDir::Right));
        assert_eq!(key_direction(KeyCode::Char('s')), Some(MoveDir::Down));
        assert_eq!(key_direction(KeyCode::Char('r')), None);
    }

    #[test]
    fn repeat_is_not_a_fresh_press() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::Char('r')), now);
        assert!(input.restart_pressed());

        input.fresh_presses.clear();
        input.record(press(KeyCode::Char('r')), now);
        assert!(!input.restart_pressed());
    }

    #[test]
    fn direction_priority_is_up_down_left_right() {
        let now = Instant::now();

        let mut input = InputState::new();
        input.record(press(KeyCode::Up), now);
        input.record(press(KeyCode::Right), now + Duration::from_millis(1));
        assert_eq!(input.held_direction(), Some(MoveDir::Up));

        let mut input = InputState::new();
        input.record(press(KeyCode::Char('d')), now);
        input.record(press(KeyCode::Left), now);
        assert_eq!(input.held_direction(), Some(MoveDir::Left));
    }

    #[test]
    fn simultaneous_presses_resolve_the_same_way() {
        let now = Instant::now();
        for _ in 0..200 {
            let mut input = InputState::new();
            for code in [KeyCode::Right, KeyCode::Left, KeyCode::Down, KeyCode::Up] {
                input.record(press(code), now);
            }
            assert_eq!(input.held_direction(), Some(MoveDir::Up));
        }
    }

    #[test]
    fn release_event_is_ignored_until_timeout() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::Up), now);
        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        input.record(release, now);
        assert_eq!(input.held_direction(), Some(MoveDir::Up));
        input.expire(now + HOLD_TIMEOUT);
        assert_eq!(input.held_direction(), None);
    }

    #[test]
    fn keys_expire_after_timeout() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::Right), now);
        input.expire(now + HOLD_TIMEOUT);
        assert!(input.last_active.is_empty());
    }

    #[test]
    fn ctrl_c_quits() {
        let mut input = InputState::new();
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(input.quit_pressed());
    }
}
