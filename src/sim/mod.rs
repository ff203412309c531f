/// Simulation: sessions, the per-tick step, maze sources and the game shell.

pub mod event;
pub mod game;
pub mod layout;
pub mod maze;
pub mod session;
pub mod step;
