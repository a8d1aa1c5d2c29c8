//! Amiga-style demo effects rendered into a low-resolution framebuffer:
//! a sine scroller with shadow and reflection, bouncing copper bars and a
//! drifting checkerboard, presented in a true-colour terminal.

pub mod config;
pub mod engine;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod texture;
pub mod types;
