pub mod bombs;
pub mod bot;
pub mod config;
pub mod enemies;
pub mod error;
pub mod grid;
pub mod input;
pub mod logic;
pub mod maps;
pub mod pathfinding;
pub mod render;
pub mod session;
