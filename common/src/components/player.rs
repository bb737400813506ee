use bevy::prelude::Component;
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr};

/// Compact per-session player handle, also used inside metadata keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Component,
)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Component)]
pub struct PlayerName(pub String);

#[derive(Debug, Clone, Copy, Component)]
pub struct PlayerNetworkAddr(pub SocketAddr);
