use bevy::prelude::Bundle;
use hns_common::components::player::{PlayerId, PlayerName, PlayerNetworkAddr};

#[derive(Debug, Bundle)]
pub struct ServerPlayerBundle {
    pub id: PlayerId,
    pub name: PlayerName,
    pub network_addr: PlayerNetworkAddr,
}
