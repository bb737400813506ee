use crate::systems::PacketDestination;
use hns_common::{
    metadata::{bool_value, MetadataKey},
    network::{ConnectPacket, DeliveryType, GameEvent, ServerToClient},
};
use std::net::SocketAddr;

pub struct NewPlayer {
    pub addr: SocketAddr,
    pub connect_packet: ConnectPacket,
}

pub struct OutgoingPacket {
    pub destination: PacketDestination,
    pub packet: ServerToClient,
    pub delivery_type: DeliveryType,
    pub stream_id: Option<u8>,
}

impl OutgoingPacket {
    pub fn new(
        destination: PacketDestination,
        packet: ServerToClient,
        delivery_type: DeliveryType,
        stream_id: Option<u8>,
    ) -> Self {
        Self { destination, packet, delivery_type, stream_id }
    }
}

/// One authoritative metadata write. The replication system applies it to
/// the store and broadcasts the change notification, in emission order.
#[derive(Debug, Clone)]
pub struct MetadataWrite {
    pub key: MetadataKey,
    pub value: String,
}

impl MetadataWrite {
    pub fn new(key: MetadataKey, value: impl Into<String>) -> Self {
        Self { key, value: value.into() }
    }

    pub fn flag(key: MetadataKey, value: bool) -> Self {
        Self { key, value: bool_value(value).to_string() }
    }
}

/// A trigger to broadcast to every instance, after pending metadata
/// writes have gone out.
#[derive(Debug, Clone, Copy)]
pub struct TriggerGameEvent(pub GameEvent);
