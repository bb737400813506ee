use bevy::prelude::{Bundle, Component};
use hns_common::components::player::{PlayerId, PlayerName};

/// Marks a player the local view must not render. Applied to every other
/// player on a seeker's instance when the round starts.
#[derive(Debug, Component)]
pub struct Hidden;

#[derive(Debug, Bundle)]
pub struct ClientPlayerBundle {
    pub id: PlayerId,
    pub name: PlayerName,
}
