use crate::metadata::MetadataKey;
use laminar::Packet;
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, str::FromStr};
use thiserror::Error;

pub const GAME_VERSION: u32 = 0;

pub const LOBBY_STREAM: u8 = 0;
/// Metadata changes and game events share one ordered stream so that a
/// round-start trigger can never overtake the role flags it depends on.
pub const ROUND_STREAM: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerToClient {
    ConnectAck(ConnectAckPacket),
    NewPlayer(NewPlayerPacket),
    FullGameState(FullGameStatePacket),
    LobbyTick(LobbyTickPacket),
    MetadataChanged(MetadataChangedPacket),
    GameEvent(GameEventPacket),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectAckPacket {
    pub id: u8,
}

impl ConnectAckPacket {
    pub fn new(id: u8) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayerPacket {
    pub name: String,
    pub id: u8,
}

impl NewPlayerPacket {
    pub fn new(name: String, id: u8) -> Self {
        Self { name, id }
    }
}

// Only needed for players joining the lobby, because players
// can't join a round in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullGameStatePacket {
    pub players: Vec<NewPlayerPacket>,
}

impl FullGameStatePacket {
    pub fn new(players: Vec<NewPlayerPacket>) -> Self {
        Self { players }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyTickPacket {
    pub seconds_remaining: u64,
}

impl LobbyTickPacket {
    pub fn new(seconds_remaining: u64) -> Self {
        Self { seconds_remaining }
    }
}

/// Change notification for one replicated metadata entry, key and value in
/// their wire string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataChangedPacket {
    pub key: String,
    pub value: String,
}

impl MetadataChangedPacket {
    pub fn new(key: MetadataKey, value: impl Into<String>) -> Self {
        Self { key: key.to_string(), value: value.into() }
    }
}

/// Broadcast trigger, the event name in its wire string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEventPacket {
    pub name: String,
}

impl GameEventPacket {
    pub fn new(event: GameEvent) -> Self {
        Self { name: event.as_str().to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ClientToServer {
    Connect(ConnectPacket),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectPacket {
    pub version: u32,
    pub name: String,
}

impl ConnectPacket {
    pub fn new(name: &str) -> Self {
        Self { version: GAME_VERSION, name: name.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
}

impl GameEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            GameEvent::RoundStarted => "RoundStarted",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown game event: {0:?}")]
pub struct UnknownGameEvent(pub String);

impl FromStr for GameEvent {
    type Err = UnknownGameEvent;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "RoundStarted" => Ok(GameEvent::RoundStarted),
            other => Err(UnknownGameEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryType {
    ReliableOrdered,
    ReliableSequenced,
    UnreliableSequenced,
    Unreliable,
}

pub fn make_packet(
    delivery_type: DeliveryType,
    data: Vec<u8>,
    addr: SocketAddr,
    stream_id: Option<u8>,
) -> Packet {
    match delivery_type {
        DeliveryType::ReliableOrdered => Packet::reliable_ordered(addr, data, stream_id),
        DeliveryType::ReliableSequenced => Packet::reliable_sequenced(addr, data, stream_id),
        DeliveryType::UnreliableSequenced => Packet::unreliable_sequenced(addr, data, stream_id),
        DeliveryType::Unreliable => Packet::unreliable(addr, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_event_wire_name_round_trips() {
        assert_eq!("RoundStarted".parse::<GameEvent>(), Ok(GameEvent::RoundStarted));
        assert_eq!(GameEvent::RoundStarted.to_string(), "RoundStarted");
    }

    #[test]
    fn unknown_game_event_is_a_typed_error() {
        assert_eq!(
            "RoundEnded".parse::<GameEvent>(),
            Err(UnknownGameEvent("RoundEnded".to_string()))
        );
    }
}
