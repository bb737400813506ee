use crate::{
    config::ServerConfig,
    events::{NewPlayer, OutgoingPacket},
    resources::AddrToPlayer,
    systems::labels,
    TICK_RATE_HZ,
};
use bevy::{
    ecs::event::Events,
    prelude::{App, Commands, EventWriter, IntoSystemConfig, Plugin, Query, Res, ResMut},
};
use hns_common::{
    components::player::PlayerNetworkAddr,
    laminar::{Config as NetworkConfig, Socket, SocketEvent},
    network::{make_packet, ClientToServer},
    resources::{
        network::{NetRx, NetTx, NetworkThread},
        PlayerToEntity,
    },
};
use std::{net::SocketAddr, time::Duration};
use tracing::{debug, info, warn};

pub struct ServerNetworkPlugin;

impl Plugin for ServerNetworkPlugin {
    fn build(&self, app: &mut App) {
        app.add_startup_system(setup)
            .init_resource::<Events<NewPlayer>>()
            .init_resource::<Events<OutgoingPacket>>()
            .init_resource::<AddrToPlayer>()
            .init_resource::<PlayerToEntity>()
            .add_system(
                network_receive.in_set(labels::NetworkSystem::Receive).in_set(labels::Network),
            )
            .add_system(
                network_send
                    .in_set(labels::NetworkSystem::SendPackets)
                    .in_set(labels::Network)
                    .after(labels::Lobby)
                    .after(labels::Replication),
            );
    }
}

fn setup(mut commands: Commands, config: Res<ServerConfig>) {
    let mut socket = initialize_network(config.bind_addr);
    let (net_tx, net_rx) = (socket.get_packet_sender(), socket.get_event_receiver());

    let network_thread = std::thread::spawn(move || {
        socket.start_polling_with_duration(Some(Duration::from_millis(
            (1000 / TICK_RATE_HZ / 2) as u64,
        )))
    });

    commands.insert_resource(NetworkThread(network_thread));
    commands.insert_resource(NetTx(net_tx));
    commands.insert_resource(NetRx(net_rx));
}

fn initialize_network(bind_addr: SocketAddr) -> Socket {
    let net_config = NetworkConfig {
        idle_connection_timeout: Duration::from_secs(5),
        heartbeat_interval: Some(Duration::from_secs(4)),
        ..NetworkConfig::default()
    };

    let socket = Socket::bind_with_config(bind_addr, net_config)
        .expect("Couldn't bind to the server address");

    info!("Listening on {}", bind_addr);

    socket
}

fn network_receive(
    mut commands: Commands,
    mut players: ResMut<AddrToPlayer>,
    mut player_to_entity: ResMut<PlayerToEntity>,
    net_rx: Res<NetRx>,
    mut new_player_tx: EventWriter<NewPlayer>,
) {
    let players = &mut players.0;
    let net_rx = &net_rx.0;

    for event in net_rx.try_iter() {
        match event {
            SocketEvent::Packet(packet) => {
                let msg = packet.payload();

                if let Ok(decoded) = bincode::deserialize::<ClientToServer>(msg) {
                    match decoded {
                        ClientToServer::Connect(connect_packet) => {
                            new_player_tx.send(NewPlayer { addr: packet.addr(), connect_packet });
                        },
                    }
                } else {
                    warn!("Received an invalid packet from {}", packet.addr());
                }
            },
            SocketEvent::Timeout(addr) => {
                if let Some(player_id) = players.get(&addr) {
                    warn!("{} ({}) timed out", player_id, addr);
                } else {
                    warn!("Unknown player timed out: {}", addr);
                }
            },
            SocketEvent::Connect(addr) => {
                debug!("Client connected: {}", addr);
            },
            SocketEvent::Disconnect(addr) => {
                if let Some(player_id) = players.remove(&addr) {
                    if let Some(entity) = player_to_entity.0.remove(&player_id) {
                        commands.entity(entity).despawn();
                    }

                    info!("Player {} disconnected ({})", player_id, addr);
                } else {
                    debug!("Unknown player disconnected: {}", addr);
                }
            },
        }
    }
}

#[allow(unused)]
pub enum PacketDestination {
    Single(SocketAddr),
    BroadcastToAll,
    BroadcastToAllExcept(SocketAddr),
    BroadcastToSet(Vec<SocketAddr>),
}

fn network_send(
    net_tx: Res<NetTx>,
    mut outgoing_packets: ResMut<Events<OutgoingPacket>>,
    player_addrs: Query<&PlayerNetworkAddr>,
) {
    let net_tx = &net_tx.0;

    for outgoing in outgoing_packets.drain() {
        let data = match bincode::serialize(&outgoing.packet) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize a packet: {:?}", e);
                continue;
            },
        };

        match &outgoing.destination {
            PacketDestination::Single(addr) => {
                let packet = make_packet(outgoing.delivery_type, data, *addr, outgoing.stream_id);

                if let Err(e) = net_tx.send(packet) {
                    warn!("Failed to send packet: {:?}", e);
                }
            },
            PacketDestination::BroadcastToAll => {
                player_addrs.iter().for_each(|PlayerNetworkAddr(addr)| {
                    // TODO - Ideally we wouldn't clone this Vec here, but laminar
                    // packets take a Vec<u8> instead of a slice.
                    let packet = make_packet(
                        outgoing.delivery_type,
                        data.clone(),
                        *addr,
                        outgoing.stream_id,
                    );

                    if let Err(e) = net_tx.send(packet) {
                        warn!("Failed to send packet: {:?}", e);
                    }
                });
            },
            PacketDestination::BroadcastToAllExcept(exclude_addr) => {
                player_addrs
                    .iter()
                    .filter(|PlayerNetworkAddr(addr)| *addr != *exclude_addr)
                    .for_each(|PlayerNetworkAddr(addr)| {
                        let packet = make_packet(
                            outgoing.delivery_type,
                            data.clone(),
                            *addr,
                            outgoing.stream_id,
                        );

                        if let Err(e) = net_tx.send(packet) {
                            warn!("Failed to send packet: {:?}", e);
                        }
                    });
            },
            PacketDestination::BroadcastToSet(addrs) => {
                addrs.iter().for_each(|addr| {
                    let packet = make_packet(
                        outgoing.delivery_type,
                        data.clone(),
                        *addr,
                        outgoing.stream_id,
                    );

                    if let Err(e) = net_tx.send(packet) {
                        warn!("Failed to send packet: {:?}", e);
                    }
                });
            },
        }
    }
}
