use bevy::prelude::SystemSet;

#[derive(Clone, Hash, Debug, PartialEq, Eq, SystemSet)]
pub struct Network;

#[derive(Clone, Hash, Debug, PartialEq, Eq, SystemSet)]
pub struct Lobby;

#[derive(Clone, Hash, Debug, PartialEq, Eq, SystemSet)]
pub struct Replication;

#[derive(Clone, Hash, Debug, PartialEq, Eq, SystemSet)]
pub enum NetworkSystem {
    Receive,
    SendPackets,
}
