use bevy::prelude::Resource;
use hns_common::components::player::PlayerId;
use std::net::SocketAddr;

/// Connection to the server this instance is part of.
#[derive(Debug, Resource)]
pub struct Session {
    pub server_addr: SocketAddr,
}

impl Session {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

/// Our own small id, known once the server acknowledges the connect.
#[derive(Debug, Default, Resource)]
pub struct LocalPlayer(pub Option<PlayerId>);

/// Avatar barcode forced onto the local player for the round, if any.
#[derive(Debug, Default, Resource)]
pub struct AvatarOverride(pub Option<String>);

/// Whether the local player can die. Seekers are invulnerable for the
/// round, hiders are mortal.
#[derive(Debug, Resource)]
pub struct Mortality(pub bool);

impl Default for Mortality {
    fn default() -> Self {
        Self(true)
    }
}
