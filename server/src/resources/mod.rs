use bevy::prelude::Resource;
use hns_common::components::player::PlayerId;
use rand::rngs::StdRng;
use std::{collections::HashMap, net::SocketAddr};

#[derive(Debug, Default, Resource)]
pub struct AddrToPlayer(pub HashMap<SocketAddr, PlayerId>);

/// Session-wide RNG, seeded from entropy at startup and from a fixed seed
/// in tests.
#[derive(Debug, Resource)]
pub struct SessionRng(pub StdRng);
