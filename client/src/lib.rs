pub mod components;
pub mod config;
pub mod resources;
pub mod systems;

pub const TICK_RATE_HZ: usize = 30;
