pub mod game;
pub mod names;
