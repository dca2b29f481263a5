pub mod board;
pub mod display_format;
pub mod error;
pub mod game;
pub mod location;
pub mod piece;
