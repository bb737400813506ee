use bevy::prelude::States;

pub mod avatars;
pub mod components;
pub mod metadata;
pub mod network;
pub mod notification;
pub mod resources;

pub use laminar;

#[derive(States, Default, Debug, Clone, Eq, PartialEq, Hash)]
pub enum GameState {
    #[default]
    Lobby,
    RoundActive,
}

/// Role a player holds for the current round, derived from their
/// replicated seeker flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRole {
    Seeker,
    Hider,
}

impl PlayerRole {
    pub fn from_seeker_flag(is_seeker: bool) -> Self {
        if is_seeker {
            PlayerRole::Seeker
        } else {
            PlayerRole::Hider
        }
    }

    pub fn is_seeker(self) -> bool {
        matches!(self, PlayerRole::Seeker)
    }
}
