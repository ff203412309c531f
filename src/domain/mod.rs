/// Game rules with no I/O: grid, solver, pursuer AI, encounter rules.

pub mod ai;
pub mod entity;
pub mod grid;
pub mod path;
pub mod rules;
pub mod tile;
