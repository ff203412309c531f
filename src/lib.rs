/// Maze Escape: steer a rat to the goal hole while a pursuer closes in.
///
/// `domain` holds the pure rules, `sim` the session lifecycle, `ui` the
/// terminal front end. The binary in `main.rs` wires them together.

pub mod config;
pub mod domain;
pub mod sim;
pub mod ui;
