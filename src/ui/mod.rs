/// Terminal front end: keyboard, gamepad, sound and the renderer.

pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sound;
