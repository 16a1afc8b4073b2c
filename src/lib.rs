//! Snake on a wrapping grid. The game core (`grid`, `snake`, `food`,
//! `session`) knows nothing about the terminal; `term` and `game` put it on
//! screen with crossterm.

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod session;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
