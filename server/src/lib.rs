pub mod components;
pub mod config;
pub mod events;
pub mod resources;
pub mod systems;

pub const MAX_PLAYERS: usize = 16;
pub const TICK_RATE_HZ: usize = 30;
