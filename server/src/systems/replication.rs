use crate::{
    events::{MetadataWrite, OutgoingPacket, TriggerGameEvent},
    systems::{labels, PacketDestination},
};
use bevy::{
    ecs::event::Events,
    prelude::{App, EventWriter, IntoSystemConfig, Plugin, ResMut},
};
use hns_common::{
    metadata::MetadataStore,
    network::{DeliveryType, GameEventPacket, MetadataChangedPacket, ServerToClient, ROUND_STREAM},
};
use tracing::debug;

/// Applies authoritative metadata writes to the store and turns them into
/// change notifications for every client. Game event triggers go out on
/// the same ordered stream, after the writes that precede them.
pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.add_system(
            replicate_metadata_writes
                .in_set(labels::Replication)
                .after(labels::Lobby)
                .before(labels::NetworkSystem::SendPackets),
        )
        .add_system(
            broadcast_game_events
                .in_set(labels::Replication)
                .after(replicate_metadata_writes)
                .before(labels::NetworkSystem::SendPackets),
        );
    }
}

fn replicate_metadata_writes(
    mut writes: ResMut<Events<MetadataWrite>>,
    mut store: ResMut<MetadataStore>,
    mut outgoing_tx: EventWriter<OutgoingPacket>,
) {
    for write in writes.drain() {
        debug!("Metadata write: {} = {}", write.key, write.value);

        store.set(write.key, write.value.clone());

        outgoing_tx.send(OutgoingPacket::new(
            PacketDestination::BroadcastToAll,
            ServerToClient::MetadataChanged(MetadataChangedPacket::new(write.key, write.value)),
            DeliveryType::ReliableOrdered,
            Some(ROUND_STREAM),
        ));
    }
}

fn broadcast_game_events(
    mut triggers: ResMut<Events<TriggerGameEvent>>,
    mut outgoing_tx: EventWriter<OutgoingPacket>,
) {
    for TriggerGameEvent(event) in triggers.drain() {
        debug!("Broadcasting game event: {}", event);

        outgoing_tx.send(OutgoingPacket::new(
            PacketDestination::BroadcastToAll,
            ServerToClient::GameEvent(GameEventPacket::new(event)),
            DeliveryType::ReliableOrdered,
            Some(ROUND_STREAM),
        ));
    }
}
